//! Worker pool management and task dispatch
//!
//! The pool owns `W` worker tasks fed from one bounded channel of composite
//! `Task` values. Submission assigns dense, order-of-appearance ids and
//! applies backpressure once the channel is full; closing the channel lets
//! workers drain whatever is queued and exit; `wait()` joins every worker
//! and returns the merged [`RunSummary`].
//!
//! The id travels inside the task value itself (not through a second,
//! separately-consumed channel), so concurrent workers can never pair an id
//! with the wrong record.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::config::WorkerConfig;
use super::core::DownloadWorker;
use super::types::{RunSummary, TaskLog, TaskOutcome};
use crate::app::client::MemoriesClient;
use crate::app::models::{MediaRecord, Task};
use crate::app::paths::MediaDirs;
use crate::app::timestamps::Clock;
use crate::errors::{AppError, Result};

/// Pool of download workers sharing one task channel
pub struct WorkerPool {
    worker_handles: Vec<JoinHandle<RunSummary>>,
    /// `Some` while accepting submissions; dropped by `close()`
    task_tx: Option<mpsc::Sender<Task>>,
    /// Next dense task id
    next_id: u64,
}

impl WorkerPool {
    /// Start `config.worker_count` workers
    ///
    /// Outcomes are reported on `outcome_tx` as they happen (completion order
    /// across workers is unspecified); the same information is aggregated
    /// into the summary returned by [`WorkerPool::wait`].
    pub fn start(
        config: WorkerConfig,
        dirs: MediaDirs,
        client: MemoriesClient,
        log: Arc<dyn TaskLog>,
        clock: Arc<dyn Clock>,
        outcome_tx: mpsc::Sender<TaskOutcome>,
    ) -> Self {
        let (task_tx, task_rx) = mpsc::channel::<Task>(config.task_channel_capacity);
        let task_rx = Arc::new(Mutex::new(task_rx));

        info!("Starting {} workers", config.worker_count);

        let worker_handles = (0..config.worker_count)
            .map(|worker_id| {
                let worker = DownloadWorker::new(
                    worker_id as u32,
                    config.clone(),
                    dirs.clone(),
                    client.clone(),
                    log.clone(),
                    clock.clone(),
                    task_rx.clone(),
                    outcome_tx.clone(),
                );
                tokio::spawn(worker.run())
            })
            .collect();

        Self {
            worker_handles,
            task_tx: Some(task_tx),
            next_id: 0,
        }
    }

    /// Submit one record, assigning it the next dense task id
    ///
    /// Blocks (awaits) while the bounded channel is full. Returns the id the
    /// record was assigned.
    pub async fn submit(&mut self, record: MediaRecord) -> Result<u64> {
        let tx = self
            .task_tx
            .as_ref()
            .ok_or_else(|| AppError::generic("cannot submit after close"))?;

        let id = self.next_id;
        tx.send(Task::new(id, record))
            .await
            .map_err(|_| AppError::generic("task channel closed: all workers exited"))?;
        self.next_id += 1;
        Ok(id)
    }

    /// Signal that no further tasks will arrive
    ///
    /// Workers drain the remaining queued tasks and then exit. Idempotent.
    pub fn close(&mut self) {
        if self.task_tx.take().is_some() {
            debug!("Task channel closed after {} submissions", self.next_id);
        }
    }

    /// Block until every worker has exited, returning the merged summary
    ///
    /// Implies [`WorkerPool::close`]. Returning means every submitted task
    /// produced exactly one outcome, not that every task succeeded; check
    /// [`RunSummary::is_success`] for that.
    pub async fn wait(mut self) -> RunSummary {
        self.close();

        let mut summary = RunSummary::default();
        for handle in self.worker_handles {
            match handle.await {
                Ok(worker_summary) => summary.merge(&worker_summary),
                // A panicking worker loses its counters but must not take
                // down the run.
                Err(e) => warn!("worker task panicked: {e}"),
            }
        }

        info!("All workers drained: {}", summary);
        summary
    }

    /// Number of tasks submitted so far
    pub fn submitted(&self) -> u64 {
        self.next_id
    }

    /// Number of workers owned by the pool
    pub fn worker_count(&self) -> usize {
        self.worker_handles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::client::ClientConfig;
    use crate::app::timestamps::SystemClock;
    use crate::app::worker::types::test_support::MemoryLog;
    use crate::app::worker::types::LogLevel;
    use std::collections::HashSet;
    use tempfile::{tempdir, TempDir};

    struct PoolFixture {
        _root: TempDir,
        log: Arc<MemoryLog>,
        pool: WorkerPool,
        outcome_rx: mpsc::Receiver<TaskOutcome>,
    }

    fn start_pool(worker_count: usize, capacity: usize) -> PoolFixture {
        let root = tempdir().unwrap();
        let dirs = MediaDirs {
            image_dir: root.path().join("images"),
            video_dir: root.path().join("videos"),
        };
        std::fs::create_dir_all(&dirs.image_dir).unwrap();
        std::fs::create_dir_all(&dirs.video_dir).unwrap();

        let log = Arc::new(MemoryLog::default());
        let (outcome_tx, outcome_rx) = mpsc::channel(1024);
        let pool = WorkerPool::start(
            WorkerConfig {
                worker_count,
                task_channel_capacity: capacity,
                ..WorkerConfig::default()
            },
            dirs,
            MemoriesClient::new(&ClientConfig::default()).unwrap(),
            log.clone(),
            Arc::new(SystemClock),
            outcome_tx,
        );

        PoolFixture {
            _root: root,
            log,
            pool,
            outcome_rx,
        }
    }

    fn unknown_record(n: usize) -> MediaRecord {
        MediaRecord {
            timestamp: format!("2023-06-01 14:30:{:02}", n % 60),
            media_type: "GIF".to_string(),
            source_link: "http://127.0.0.1:1/unused".to_string(),
        }
    }

    #[tokio::test]
    async fn test_ids_are_dense_and_ordered() {
        let mut fx = start_pool(2, 8);

        for expected in 0..5u64 {
            let id = fx.pool.submit(unknown_record(expected as usize)).await.unwrap();
            assert_eq!(id, expected);
        }
        assert_eq!(fx.pool.submitted(), 5);

        let summary = fx.pool.wait().await;
        assert_eq!(summary.total(), 5);
    }

    #[tokio::test]
    async fn test_every_task_gets_exactly_one_outcome() {
        // More tasks than channel capacity and workers, to exercise
        // backpressure and contention
        let mut fx = start_pool(4, 2);

        for n in 0..50 {
            fx.pool.submit(unknown_record(n)).await.unwrap();
        }

        let summary = fx.pool.wait().await;
        assert_eq!(summary.total(), 50);
        assert_eq!(summary.skipped_unknown, 50);
        assert!(summary.is_success());

        let mut seen = HashSet::new();
        while let Ok(outcome) = fx.outcome_rx.try_recv() {
            assert!(seen.insert(outcome.task_id()), "duplicate outcome");
        }
        assert_eq!(seen.len(), 50);
        assert_eq!(seen, (0..50u64).collect::<HashSet<_>>());
    }

    #[tokio::test]
    async fn test_single_worker_pool_drains() {
        let mut fx = start_pool(1, 1);

        for n in 0..10 {
            fx.pool.submit(unknown_record(n)).await.unwrap();
        }

        let summary = fx.pool.wait().await;
        assert_eq!(summary.total(), 10);
    }

    #[tokio::test]
    async fn test_unknown_records_log_one_warning_each() {
        let mut fx = start_pool(2, 8);

        for n in 0..4 {
            fx.pool.submit(unknown_record(n)).await.unwrap();
        }
        fx.pool.wait().await;

        assert_eq!(fx.log.count_at(LogLevel::Warn), 4);
        assert_eq!(fx.log.count_at(LogLevel::Error), 0);
        for id in 0..4u64 {
            assert_eq!(fx.log.lines_for(id).len(), 1);
        }
    }

    #[tokio::test]
    async fn test_submit_after_close_is_an_error() {
        let mut fx = start_pool(1, 4);

        fx.pool.submit(unknown_record(0)).await.unwrap();
        fx.pool.close();
        assert!(fx.pool.submit(unknown_record(1)).await.is_err());

        let summary = fx.pool.wait().await;
        assert_eq!(summary.total(), 1);
    }

    #[tokio::test]
    async fn test_worker_count() {
        let fx = start_pool(3, 4);
        assert_eq!(fx.pool.worker_count(), 3);
        fx.pool.wait().await;
    }
}
