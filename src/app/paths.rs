//! Collision-safe filename resolution
//!
//! Maps a media record to a concrete filesystem path: a type-specific
//! directory, a stem derived from the record's timestamp, and a
//! collision-avoidance suffix when an earlier record already claimed the base
//! name. Claiming is done with `O_CREAT | O_EXCL` semantics so two workers
//! racing on the same stem can never both win a name; cross-process races
//! against the same directory remain out of scope (single-run tool).

use std::path::{Path, PathBuf};

use tokio::fs::OpenOptions;
use tracing::debug;

use crate::app::models::MediaKind;
use crate::constants::files;
use crate::errors::{TaskError, TaskResult};

/// Target directories for each writable media kind
#[derive(Debug, Clone)]
pub struct MediaDirs {
    pub image_dir: PathBuf,
    pub video_dir: PathBuf,
}

impl MediaDirs {
    /// Directory and extension for a media kind
    ///
    /// Returns `None` for [`MediaKind::Unknown`]; no path is ever produced
    /// (and no file ever written) for unclassifiable records.
    pub fn target_for(&self, kind: &MediaKind) -> Option<(&Path, &'static str)> {
        match kind {
            MediaKind::Image => Some((self.image_dir.as_path(), files::IMAGE_EXTENSION)),
            MediaKind::Video => Some((self.video_dir.as_path(), files::VIDEO_EXTENSION)),
            MediaKind::Unknown => None,
        }
    }
}

/// Derive a filesystem-safe filename stem from a record timestamp
///
/// `"2023-06-01 14:30:00"` becomes `"2023-06-01_14-30-00"`: the space joining
/// date and time becomes an underscore and the colons become hyphens, both of
/// which are unsafe on common filesystems.
pub fn filename_stem(timestamp: &str) -> String {
    timestamp.trim().replace(' ', "_").replace(':', "-")
}

/// A candidate path for one collision-avoidance attempt
///
/// Recomputed per attempt, never persisted. Attempt 0 is the bare stem;
/// attempt `n` appends `-n` before the extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub directory: PathBuf,
    pub stem: String,
    pub extension: &'static str,
    pub attempt: u32,
}

impl ResolvedPath {
    /// The concrete candidate path for this attempt
    pub fn candidate(&self) -> PathBuf {
        let file_name = if self.attempt == 0 {
            format!("{}.{}", self.stem, self.extension)
        } else {
            format!("{}-{}.{}", self.stem, self.attempt, self.extension)
        };
        self.directory.join(file_name)
    }
}

/// Claim a collision-free path under `directory` for the given stem
///
/// Tries the bare stem first, then `stem-1`, `stem-2`, ... up to
/// `max_attempts` suffixed candidates. Each try creates the file with
/// `create_new`, so a name is atomically claimed the moment the call
/// succeeds and is never reused by a later attempt in the same run.
///
/// When every candidate already exists the task fails with
/// [`TaskError::PathExhausted`]; existing files are never overwritten.
pub async fn claim_path(
    directory: &Path,
    stem: &str,
    extension: &'static str,
    max_attempts: u32,
) -> TaskResult<PathBuf> {
    for attempt in 0..=max_attempts {
        let resolved = ResolvedPath {
            directory: directory.to_path_buf(),
            stem: stem.to_string(),
            extension,
            attempt,
        };
        let candidate = resolved.candidate();

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
            .await
        {
            Ok(_file) => {
                if attempt > 0 {
                    debug!(
                        "Claimed {} after {} collision attempt(s)",
                        candidate.display(),
                        attempt
                    );
                }
                return Ok(candidate);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(TaskError::Filesystem {
                    path: candidate,
                    source: e,
                })
            }
        }
    }

    Err(TaskError::PathExhausted {
        stem: stem.to_string(),
        attempts: max_attempts,
    })
}
