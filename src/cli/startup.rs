//! Startup initialization
//!
//! Builds the run context explicitly rather than through implicit
//! process-wide side effects: load and validate configuration, create the
//! target directories, and hand the result to the pipeline as a value. Every
//! failure here is fatal and happens before any worker exists.

use std::path::Path;

use tracing::debug;

use crate::app::paths::MediaDirs;
use crate::config::FetchConfig;
use crate::errors::{ConfigError, Result};

/// Validated configuration plus the resources acquired at startup
#[derive(Debug, Clone)]
pub struct RunContext {
    pub config: FetchConfig,
    pub dirs: MediaDirs,
}

/// Validate the configuration and acquire the run's resources
///
/// Creates the image and video directories (including `root_dir`) if they do
/// not exist yet.
pub fn initialize(config: FetchConfig) -> Result<RunContext> {
    config.validate()?;

    let dirs = config.media_dirs();
    ensure_directory(&dirs.image_dir)?;
    ensure_directory(&dirs.video_dir)?;

    debug!(
        "Run context ready: images -> {}, videos -> {}",
        dirs.image_dir.display(),
        dirs.video_dir.display()
    );

    Ok(RunContext { config, dirs })
}

fn ensure_directory(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|source| {
        ConfigError::DirectoryCreation {
            path: path.to_path_buf(),
            source,
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use tempfile::tempdir;

    #[test]
    fn test_initialize_creates_directories() {
        let root = tempdir().unwrap();
        let config = FetchConfig {
            root_dir: root.path().join("memories"),
            ..FetchConfig::default()
        };

        let context = initialize(config).unwrap();
        assert!(context.dirs.image_dir.is_dir());
        assert!(context.dirs.video_dir.is_dir());
        assert!(context.dirs.image_dir.starts_with(root.path()));
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let root = tempdir().unwrap();
        let config = FetchConfig {
            root_dir: root.path().to_path_buf(),
            ..FetchConfig::default()
        };

        initialize(config.clone()).unwrap();
        initialize(config).unwrap();
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        let config = FetchConfig {
            worker_count: 0,
            ..FetchConfig::default()
        };
        let result = initialize(config);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_unwritable_root_is_fatal() {
        let root = tempdir().unwrap();
        // A file where the root directory should go
        let blocker = root.path().join("blocked");
        std::fs::write(&blocker, b"").unwrap();

        let config = FetchConfig {
            root_dir: blocker,
            ..FetchConfig::default()
        };
        let result = initialize(config);
        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::DirectoryCreation { .. }))
        ));
    }
}
