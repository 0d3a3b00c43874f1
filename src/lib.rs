//! Memories Fetcher Library
//!
//! A Rust library for downloading the media listed in an exported memories
//! manifest. Provides concurrent two-phase downloads (resolve the opaque link,
//! then fetch the bytes), collision-safe filenames, and original-timestamp
//! restoration.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use constants::*;

    #[test]
    fn test_constants_accessible() {
        // Test that our constants are accessible
        assert_eq!(DEFAULT_WORKER_COUNT, 4);
        assert_eq!(IMAGE_EXTENSION, "jpg");
        assert!(USER_AGENT.contains("memories-fetcher"));
    }

    #[test]
    fn test_error_types() {
        // Test that our error types work correctly
        let task_error = errors::TaskError::UnknownMediaType("GIF".to_string());
        assert_eq!(task_error.category(), "unknown-media-type");

        let app_error = AppError::generic("boom");
        assert!(app_error.to_string().contains("boom"));
    }
}
