//! Worker pool configuration

use crate::constants::workers;
use crate::errors::ConfigError;

/// Configuration for the worker pool
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Number of concurrent workers (`W >= 1`)
    pub worker_count: usize,
    /// Bounded task channel capacity; `submit` blocks once full
    pub task_channel_capacity: usize,
    /// Maximum collision-avoidance rename attempts per task
    pub max_rename_attempts: u32,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            worker_count: workers::DEFAULT_WORKER_COUNT,
            task_channel_capacity: workers::TASK_CHANNEL_CAPACITY,
            max_rename_attempts: crate::constants::files::DEFAULT_MAX_RENAME_ATTEMPTS,
        }
    }
}

impl WorkerConfig {
    /// Validate the configuration, fatally at startup
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count == 0 {
            return Err(ConfigError::InvalidValue {
                field: "worker_count".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.worker_count > workers::MAX_WORKER_COUNT {
            return Err(ConfigError::InvalidValue {
                field: "worker_count".to_string(),
                reason: format!("must be at most {}", workers::MAX_WORKER_COUNT),
            });
        }
        if self.task_channel_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "task_channel_capacity".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
