//! Data structures for task outcomes and worker reporting

use std::path::PathBuf;

/// Severity for the injected task log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// Logging sink shared by all workers
///
/// Injected into the pool instead of living in ambient global state, and
/// required to be safe for concurrent use so interleaved lines from parallel
/// workers are never torn. The production implementation forwards to
/// `tracing`; tests substitute a collecting implementation to assert the
/// one-outcome-one-line contract.
pub trait TaskLog: Send + Sync {
    fn record(&self, level: LogLevel, task_id: u64, message: &str);
}

/// Production task log backed by the tracing subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl TaskLog for TracingLog {
    fn record(&self, level: LogLevel, task_id: u64, message: &str) {
        match level {
            LogLevel::Info => tracing::info!(task_id, "{message}"),
            LogLevel::Warn => tracing::warn!(task_id, "{message}"),
            LogLevel::Error => tracing::error!(task_id, "{message}"),
        }
    }
}

/// Final disposition of one task
///
/// Every task produces exactly one outcome, reported over the outcome channel
/// and logged exactly once. Consumed by progress reporting and the run
/// summary; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The asset was fully written to `path`
    Completed {
        task_id: u64,
        bytes_written: u64,
        path: PathBuf,
    },
    /// The record's media type was unclassifiable; no file was created
    SkippedUnknown { task_id: u64, media_type: String },
    /// The task failed; no file was left behind
    Failed {
        task_id: u64,
        category: &'static str,
        message: String,
    },
}

impl TaskOutcome {
    /// The id of the task this outcome belongs to
    pub fn task_id(&self) -> u64 {
        match self {
            TaskOutcome::Completed { task_id, .. }
            | TaskOutcome::SkippedUnknown { task_id, .. }
            | TaskOutcome::Failed { task_id, .. } => *task_id,
        }
    }
}

/// Aggregate result of a pipeline run
///
/// `wait()` returning only means every task was attempted; this summary is
/// how callers distinguish a clean run from one with failures (the CLI maps
/// `failed > 0` to a non-zero exit status).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub completed: usize,
    pub skipped_unknown: usize,
    pub failed: usize,
    pub bytes_written: u64,
}

impl RunSummary {
    /// Total tasks that produced an outcome
    pub fn total(&self) -> usize {
        self.completed + self.skipped_unknown + self.failed
    }

    /// True when no task failed (unknown-type skips are not failures)
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Fold one outcome into the summary
    pub fn absorb(&mut self, outcome: &TaskOutcome) {
        match outcome {
            TaskOutcome::Completed { bytes_written, .. } => {
                self.completed += 1;
                self.bytes_written += bytes_written;
            }
            TaskOutcome::SkippedUnknown { .. } => self.skipped_unknown += 1,
            TaskOutcome::Failed { .. } => self.failed += 1,
        }
    }

    /// Merge a per-worker summary into the pool total
    pub fn merge(&mut self, other: &RunSummary) {
        self.completed += other.completed;
        self.skipped_unknown += other.skipped_unknown;
        self.failed += other.failed;
        self.bytes_written += other.bytes_written;
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} completed ({} bytes), {} skipped, {} failed",
            self.completed, self.bytes_written, self.skipped_unknown, self.failed
        )
    }
}
