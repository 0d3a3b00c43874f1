//! Concurrent download worker system
//!
//! Integrates the client, filename resolver, and timestamp restorer into a
//! bounded pool of workers fed from a single task channel.
//!
//! # Module Organization
//!
//! - [`config`] - Worker pool configuration with validation
//! - [`types`] - Task outcomes, run summary, and the injected task log
//! - [`core`] - Individual worker driving the per-task state machine
//! - [`pool`] - Pool lifecycle: start, submit, close, wait
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use memories_fetcher::app::client::{ClientConfig, MemoriesClient};
//! use memories_fetcher::app::paths::MediaDirs;
//! use memories_fetcher::app::timestamps::SystemClock;
//! use memories_fetcher::app::worker::{TracingLog, WorkerConfig, WorkerPool};
//!
//! # async fn example(records: Vec<memories_fetcher::app::models::MediaRecord>)
//! # -> memories_fetcher::errors::Result<()> {
//! let dirs = MediaDirs {
//!     image_dir: "images".into(),
//!     video_dir: "videos".into(),
//! };
//! let client = MemoriesClient::new(&ClientConfig::default())
//!     .map_err(|e| memories_fetcher::errors::AppError::generic(e.to_string()))?;
//!
//! let (outcome_tx, mut outcome_rx) = tokio::sync::mpsc::channel(256);
//! let mut pool = WorkerPool::start(
//!     WorkerConfig::default(),
//!     dirs,
//!     client,
//!     Arc::new(TracingLog),
//!     Arc::new(SystemClock),
//!     outcome_tx,
//! );
//!
//! for record in records {
//!     pool.submit(record).await?;
//! }
//! let summary = pool.wait().await;
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod pool;
pub mod types;

// Re-export main public API
pub use config::WorkerConfig;
pub use core::DownloadWorker;
pub use pool::WorkerPool;
pub use types::{LogLevel, RunSummary, TaskLog, TaskOutcome, TracingLog};
