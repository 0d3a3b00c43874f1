//! Original-timestamp restoration
//!
//! After a successful download the written file's modification time is set
//! back to the record's capture timestamp, while the access time is stamped
//! with the current wall-clock time. Failure here never invalidates the
//! download: the worker logs a warning and still reports success.
//!
//! The current time comes from an injected [`Clock`] rather than ambient
//! global state so tests can pin the access time exactly.

use std::fs::FileTimes;
use std::path::Path;
use std::time::SystemTime;

use chrono::NaiveDateTime;

use crate::constants::manifest::TIMESTAMP_LAYOUT;
use crate::errors::TimeRestoreError;

/// Source of "now" for access-time stamping
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

/// Production clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Parse a record timestamp (`YYYY-MM-DD HH:MM:SS`, treated as UTC)
pub fn parse_record_timestamp(value: &str) -> Result<SystemTime, TimeRestoreError> {
    let parsed = NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_LAYOUT).map_err(
        |source| TimeRestoreError::Parse {
            value: value.to_string(),
            source,
        },
    )?;
    Ok(parsed.and_utc().into())
}

/// Restore a written file's times from its record
///
/// mtime becomes the parsed record timestamp; atime becomes the clock's
/// current time. Uses `std::fs::File::set_times` (stable since Rust 1.75).
pub fn restore_file_times(
    path: &Path,
    record_timestamp: &str,
    clock: &dyn Clock,
) -> Result<(), TimeRestoreError> {
    let modified = parse_record_timestamp(record_timestamp)?;
    let times = FileTimes::new()
        .set_modified(modified)
        .set_accessed(clock.now());

    let set = || -> std::io::Result<()> {
        let file = std::fs::File::options().write(true).open(path)?;
        file.set_times(times)
    };
    set().map_err(|source| TimeRestoreError::SetTimes {
        path: path.to_path_buf(),
        source,
    })
}
