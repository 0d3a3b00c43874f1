//! Application constants for Memories Fetcher
//!
//! Centralizes the constants used throughout the application, organized by
//! functional domain.

use std::time::Duration;

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = concat!("memories-fetcher/", env!("CARGO_PKG_VERSION"));

    /// Timeout applied to each of the two request phases. A stalled peer
    /// surfaces as a fetch error instead of holding a worker slot forever.
    pub const PHASE_TIMEOUT: Duration = Duration::from_secs(120);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);
}

/// Worker and concurrency configuration
pub mod workers {
    /// Default number of download workers
    pub const DEFAULT_WORKER_COUNT: usize = 4;

    /// Maximum recommended concurrent workers
    pub const MAX_WORKER_COUNT: usize = 32;

    /// Task channel capacity; submission blocks once this many tasks are
    /// queued ahead of the workers (backpressure, not an unbounded queue)
    pub const TASK_CHANNEL_CAPACITY: usize = 64;

    /// Outcome channel capacity for progress reporting
    pub const OUTCOME_CHANNEL_CAPACITY: usize = 256;
}

/// File placement and naming constants
pub mod files {
    /// Default root directory for downloaded media
    pub const DEFAULT_ROOT_DIR: &str = ".";

    /// Default subdirectory for images
    pub const DEFAULT_IMAGE_SUBDIR: &str = "images";

    /// Default subdirectory for videos
    pub const DEFAULT_VIDEO_SUBDIR: &str = "videos";

    /// Extension written for image records
    pub const IMAGE_EXTENSION: &str = "jpg";

    /// Extension written for video records
    pub const VIDEO_EXTENSION: &str = "mp4";

    /// Suffix for in-progress downloads before the atomic rename
    pub const PARTIAL_FILE_SUFFIX: &str = ".partial";

    /// Maximum collision-avoidance rename attempts before a task fails
    /// with a path-exhausted error
    pub const DEFAULT_MAX_RENAME_ATTEMPTS: u32 = 100;
}

/// Manifest format constants
pub mod manifest {
    /// Timestamp layout used both for filename stems and mtime restoration
    pub const TIMESTAMP_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

    /// Default manifest path relative to the current directory
    pub const DEFAULT_MANIFEST_PATH: &str = "json/memories_history.json";
}

/// Configuration file constants
pub mod config {
    /// Configuration file name looked up under the user config directory
    pub const CONFIG_FILE_NAME: &str = "memories_fetcher.toml";
}

// Re-export commonly used constants for convenience
pub use files::{DEFAULT_MAX_RENAME_ATTEMPTS, IMAGE_EXTENSION, VIDEO_EXTENSION};
pub use http::USER_AGENT;
pub use manifest::TIMESTAMP_LAYOUT;
pub use workers::DEFAULT_WORKER_COUNT;
