//! Core application logic for Memories Fetcher
//!
//! Contains the pipeline components: data models and manifest loading, the
//! two-phase HTTP client, collision-safe filename resolution, timestamp
//! restoration, and the worker pool that ties them together.

pub mod client;
pub mod manifest;
pub mod models;
pub mod paths;
pub mod timestamps;
pub mod worker;

// Re-export main public API
pub use client::{ClientConfig, MemoriesClient};
pub use manifest::{load_manifest, ManifestStats};
pub use models::{MediaKind, MediaRecord, Task};
pub use paths::MediaDirs;
pub use timestamps::{Clock, SystemClock};
pub use worker::{RunSummary, TaskOutcome, WorkerConfig, WorkerPool};
