//! Application configuration
//!
//! Configuration is an immutable value assembled once at startup: built-in
//! defaults, then an optional TOML file, then CLI overrides. Anything
//! malformed is fatal before the worker pool is constructed.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::app::client::ClientConfig;
use crate::app::paths::MediaDirs;
use crate::app::worker::WorkerConfig;
use crate::constants::{config as config_consts, files, workers};
use crate::errors::ConfigError;

/// Top-level configuration for a download run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    /// Number of concurrent download workers
    pub worker_count: usize,
    /// Collision-avoidance attempts before a task fails
    pub max_rename_attempts: u32,
    /// Root directory the media subdirectories live under
    pub root_dir: PathBuf,
    /// Subdirectory for images, relative to `root_dir`
    pub image_subdir: String,
    /// Subdirectory for videos, relative to `root_dir`
    pub video_subdir: String,
    /// Per-phase HTTP timeout in seconds
    pub phase_timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            worker_count: workers::DEFAULT_WORKER_COUNT,
            max_rename_attempts: files::DEFAULT_MAX_RENAME_ATTEMPTS,
            root_dir: PathBuf::from(files::DEFAULT_ROOT_DIR),
            image_subdir: files::DEFAULT_IMAGE_SUBDIR.to_string(),
            video_subdir: files::DEFAULT_VIDEO_SUBDIR.to_string(),
            phase_timeout_secs: crate::constants::http::PHASE_TIMEOUT.as_secs(),
        }
    }
}

impl FetchConfig {
    /// Load configuration from an optional explicit file path
    ///
    /// An explicitly given path must exist. Without one, the file under the
    /// user config directory is used when present, otherwise the built-in
    /// defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound {
                        path: path.to_path_buf(),
                    });
                }
                Some(path.to_path_buf())
            }
            None => default_config_path().filter(|p| p.exists()),
        };

        match path {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                let contents = std::fs::read_to_string(&path)?;
                let config: Self = toml::from_str(&contents)?;
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// Validate all fields, fatally at startup
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.worker_config().validate()?;

        if self.image_subdir.is_empty() || self.video_subdir.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "image_subdir/video_subdir".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.image_subdir == self.video_subdir {
            return Err(ConfigError::InvalidValue {
                field: "video_subdir".to_string(),
                reason: "must differ from image_subdir".to_string(),
            });
        }
        if self.phase_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "phase_timeout_secs".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Target media directories derived from root and subdirs
    pub fn media_dirs(&self) -> MediaDirs {
        MediaDirs {
            image_dir: self.root_dir.join(&self.image_subdir),
            video_dir: self.root_dir.join(&self.video_subdir),
        }
    }

    /// Worker pool configuration slice
    pub fn worker_config(&self) -> WorkerConfig {
        WorkerConfig {
            worker_count: self.worker_count,
            max_rename_attempts: self.max_rename_attempts,
            ..WorkerConfig::default()
        }
    }

    /// HTTP client configuration slice
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            phase_timeout: Duration::from_secs(self.phase_timeout_secs),
            ..ClientConfig::default()
        }
    }
}

/// Default configuration file location under the user config directory
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(config_consts::CONFIG_FILE_NAME))
}
