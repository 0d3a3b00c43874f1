//! Individual download worker
//!
//! A worker pulls composite tasks off the shared channel and drives each one
//! through the full per-task state machine: classify the media type, resolve
//! the direct URL (phase 1), stream the bytes to a partial file (phase 2),
//! claim a collision-free final name, rename into place, and restore the
//! original timestamp best-effort.
//!
//! Every exit path, success or failure, produces exactly one logged outcome,
//! and no failure path leaves a partial file on disk: bytes land under a
//! `.partial` name and only appear under the final name after the whole body
//! has been streamed.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, Mutex};
use tracing::debug;

use super::config::WorkerConfig;
use super::types::{LogLevel, RunSummary, TaskLog, TaskOutcome};
use crate::app::client::MemoriesClient;
use crate::app::models::Task;
use crate::app::paths::{claim_path, filename_stem, MediaDirs};
use crate::app::timestamps::{restore_file_times, Clock};
use crate::constants::files;
use crate::errors::{FetchError, TaskError, TaskResult};

/// Receiver end of the task channel, shared so each task is claimed by
/// exactly one worker
pub type SharedTaskReceiver = Arc<Mutex<mpsc::Receiver<Task>>>;

/// A single download worker
pub struct DownloadWorker {
    /// Worker identifier, for tracing only
    id: u32,
    config: WorkerConfig,
    dirs: MediaDirs,
    client: MemoriesClient,
    log: Arc<dyn TaskLog>,
    clock: Arc<dyn Clock>,
    task_rx: SharedTaskReceiver,
    outcome_tx: mpsc::Sender<TaskOutcome>,
}

impl DownloadWorker {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u32,
        config: WorkerConfig,
        dirs: MediaDirs,
        client: MemoriesClient,
        log: Arc<dyn TaskLog>,
        clock: Arc<dyn Clock>,
        task_rx: SharedTaskReceiver,
        outcome_tx: mpsc::Sender<TaskOutcome>,
    ) -> Self {
        Self {
            id,
            config,
            dirs,
            client,
            log,
            clock,
            task_rx,
            outcome_tx,
        }
    }

    /// Worker loop: consume tasks until the channel is closed and drained
    ///
    /// Returns this worker's share of the run summary; the pool merges the
    /// shares in `wait()`.
    pub async fn run(self) -> RunSummary {
        debug!("Worker {} starting", self.id);
        let mut summary = RunSummary::default();

        loop {
            // Hold the receiver lock only for the claim itself, so siblings
            // can grab the next task while this one downloads.
            let task = { self.task_rx.lock().await.recv().await };
            let Some(task) = task else { break };

            debug!("Worker {} claimed task {}", self.id, task.id);
            let outcome = self.process_task(task).await;
            summary.absorb(&outcome);
            self.log_outcome(&outcome);

            // The progress consumer may have gone away; outcomes are still
            // counted in the summary.
            let _ = self.outcome_tx.send(outcome).await;
        }

        debug!("Worker {} finished: {}", self.id, summary);
        summary
    }

    /// Drive one task to its single outcome; errors never escape
    async fn process_task(&self, task: Task) -> TaskOutcome {
        let task_id = task.id;
        match self.execute(&task).await {
            Ok((bytes_written, path)) => TaskOutcome::Completed {
                task_id,
                bytes_written,
                path,
            },
            Err(TaskError::UnknownMediaType(media_type)) => TaskOutcome::SkippedUnknown {
                task_id,
                media_type,
            },
            Err(e) => TaskOutcome::Failed {
                task_id,
                category: e.category(),
                message: e.to_string(),
            },
        }
    }

    /// The fallible part of the per-task state machine
    async fn execute(&self, task: &Task) -> TaskResult<(u64, PathBuf)> {
        // Classify before any network call; unknown kinds never hit the wire
        let kind = task.record.kind();
        let (dir, extension) = self
            .dirs
            .target_for(&kind)
            .ok_or_else(|| TaskError::UnknownMediaType(task.record.media_type.clone()))?;

        // Two-phase resolution: POST for the direct URL, GET for the bytes
        let direct_url = self.client.resolve(&task.record.source_link).await?;
        let response = self.client.fetch(&direct_url).await?;

        // Stream the full body to a partial file first; the final name only
        // ever points at complete content
        let stem = filename_stem(&task.record.timestamp);
        let partial = dir.join(format!(
            "{stem}.{id}{suffix}",
            id = task.id,
            suffix = files::PARTIAL_FILE_SUFFIX
        ));
        let bytes_written = match stream_to_file(response, &partial).await {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = tokio::fs::remove_file(&partial).await;
                return Err(e);
            }
        };

        // Claim a collision-free final name, then move the bytes into place
        let final_path =
            match claim_path(dir, &stem, extension, self.config.max_rename_attempts).await {
                Ok(path) => path,
                Err(e) => {
                    let _ = tokio::fs::remove_file(&partial).await;
                    return Err(e);
                }
            };

        if let Err(source) = tokio::fs::rename(&partial, &final_path).await {
            let _ = tokio::fs::remove_file(&partial).await;
            let _ = tokio::fs::remove_file(&final_path).await;
            return Err(TaskError::Filesystem {
                path: final_path,
                source,
            });
        }

        // Best effort: a failure here is a warning, not a task failure
        if let Err(e) = restore_file_times(&final_path, &task.record.timestamp, self.clock.as_ref())
        {
            self.log.record(
                LogLevel::Warn,
                task.id,
                &format!("could not restore file times: {e}"),
            );
        }

        Ok((bytes_written, final_path))
    }

    /// The one log line every outcome gets
    fn log_outcome(&self, outcome: &TaskOutcome) {
        match outcome {
            TaskOutcome::Completed {
                task_id,
                bytes_written,
                path,
            } => self.log.record(
                LogLevel::Info,
                *task_id,
                &format!("saved {} ({bytes_written} bytes)", path.display()),
            ),
            TaskOutcome::SkippedUnknown {
                task_id,
                media_type,
            } => self.log.record(
                LogLevel::Warn,
                *task_id,
                &format!("unknown media type {media_type:?}, skipping"),
            ),
            TaskOutcome::Failed {
                task_id, message, ..
            } => self.log.record(LogLevel::Error, *task_id, message),
        }
    }
}

/// Stream a response body to a file, returning the bytes written
async fn stream_to_file(response: reqwest::Response, path: &Path) -> TaskResult<u64> {
    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(|source| TaskError::Filesystem {
            path: path.to_path_buf(),
            source,
        })?;

    let mut stream = response.bytes_stream();
    let mut bytes_written = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk =
            chunk.map_err(|source| TaskError::Fetch(FetchError::StreamInterrupted { source }))?;
        file.write_all(&chunk)
            .await
            .map_err(|source| TaskError::Filesystem {
                path: path.to_path_buf(),
                source,
            })?;
        bytes_written += chunk.len() as u64;
    }

    file.flush().await.map_err(|source| TaskError::Filesystem {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(bytes_written)
}
