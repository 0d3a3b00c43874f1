//! Error types for Memories Fetcher
//!
//! This module defines error types for all components of the application.
//! Per-task errors are deliberately non-fatal: a worker converts them into a
//! logged outcome and moves on, so a single bad record can never take down
//! the pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// The HTTP phase in which a fetch error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    /// Phase 1: POST to the opaque per-item link to resolve the direct URL
    Resolve,
    /// Phase 2: GET against the resolved URL for the actual bytes
    Fetch,
}

impl std::fmt::Display for FetchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchPhase::Resolve => write!(f, "resolve"),
            FetchPhase::Fetch => write!(f, "fetch"),
        }
    }
}

/// Errors from the two-phase download protocol
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure (connection refused, timeout, TLS, ...)
    #[error("transport error during {phase} request")]
    Transport {
        phase: FetchPhase,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-200 status
    #[error("{phase} request returned HTTP {status}")]
    Status { phase: FetchPhase, status: u16 },

    /// Phase 1 returned a body that does not parse as a URL.
    ///
    /// The redirect convention (plain-text URL as POST response body) is an
    /// external protocol contract; anything that diverges from it fails
    /// closed here rather than being mis-parsed.
    #[error("resolve response is not a valid URL: {body:?}")]
    MalformedRedirect { body: String },

    /// Reading the phase 2 body stream failed mid-download
    #[error("response stream interrupted during fetch")]
    StreamInterrupted {
        #[source]
        source: reqwest::Error,
    },
}

/// Per-task errors produced while processing a single media record
///
/// All of these are contained within the worker that produced them; they are
/// logged against the task id and the pipeline continues with the next record.
#[derive(Error, Debug)]
pub enum TaskError {
    /// The record's media type is neither Image nor Video
    #[error("unknown media type: {0:?}, skipping")]
    UnknownMediaType(String),

    /// Either HTTP phase failed; no file was written
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// File create/write/rename failure
    #[error("filesystem error at {path}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Every collision-avoidance attempt produced an already-claimed path
    #[error("no free filename for stem {stem:?} after {attempts} attempts")]
    PathExhausted { stem: String, attempts: u32 },
}

impl TaskError {
    /// Error category for logging and the run summary
    pub fn category(&self) -> &'static str {
        match self {
            TaskError::UnknownMediaType(_) => "unknown-media-type",
            TaskError::Fetch(_) => "fetch",
            TaskError::Filesystem { .. } | TaskError::PathExhausted { .. } => "filesystem",
        }
    }
}

/// Timestamp restoration failures
///
/// These are warnings only: the downloaded file is complete and the task is
/// still reported as a success.
#[derive(Error, Debug)]
pub enum TimeRestoreError {
    /// The record's timestamp did not match the expected layout
    #[error("could not parse timestamp {value:?}")]
    Parse {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The OS rejected the set-times call
    #[error("could not set file times on {path}")]
    SetTimes {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Manifest loading and parsing errors
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("manifest file not found: {path}")]
    NotFound { path: PathBuf },

    /// I/O error reading the manifest
    #[error("I/O error reading manifest")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error in manifest")]
    JsonParse(#[from] serde_json::Error),

    /// The manifest parsed but contains no records
    #[error("manifest contains no media records: {path}")]
    Empty { path: PathBuf },
}

/// Configuration errors, fatal at startup before the pool is constructed
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// I/O error reading the configuration file
    #[error("I/O error reading configuration")]
    Io(#[from] std::io::Error),

    /// Invalid TOML
    #[error("invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// A value failed validation
    #[error("invalid configuration value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    /// Target directories could not be created
    #[error("could not create directory: {path}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest error
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("{message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Per-task result type alias
pub type TaskResult<T> = std::result::Result<T, TaskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_phase_display() {
        assert_eq!(FetchPhase::Resolve.to_string(), "resolve");
        assert_eq!(FetchPhase::Fetch.to_string(), "fetch");
    }

    #[test]
    fn test_task_error_categories() {
        let unknown = TaskError::UnknownMediaType("GIF".to_string());
        assert_eq!(unknown.category(), "unknown-media-type");

        let status = TaskError::Fetch(FetchError::Status {
            phase: FetchPhase::Resolve,
            status: 500,
        });
        assert_eq!(status.category(), "fetch");

        let exhausted = TaskError::PathExhausted {
            stem: "2023-01-01_10-00-00".to_string(),
            attempts: 3,
        };
        assert_eq!(exhausted.category(), "filesystem");
    }

    #[test]
    fn test_error_messages_mention_context() {
        let err = TaskError::UnknownMediaType("GIF".to_string());
        assert!(err.to_string().contains("unknown media type"));
        assert!(err.to_string().contains("GIF"));

        let err = TaskError::Fetch(FetchError::Status {
            phase: FetchPhase::Fetch,
            status: 503,
        });
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("fetch"));
    }
}
