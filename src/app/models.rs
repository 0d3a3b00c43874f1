//! Data models for Memories Fetcher
//!
//! Core data structures shared across the pipeline: media records as they
//! appear in the JSON export, the classified media kind, and the composite
//! task value handed to workers.

use serde::{Deserialize, Serialize};

/// Classified media kind for a record
///
/// The export format carries the type as a free-form string; anything that is
/// not recognizably an image or a video maps to [`MediaKind::Unknown`], which
/// is skipped with a warning rather than rejected at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Image,
    Video,
    Unknown,
}

impl MediaKind {
    /// Classify the raw media-type string from the export
    pub fn classify(raw: &str) -> Self {
        match raw {
            "Image" => Self::Image,
            "Video" => Self::Video,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Video => write!(f, "video"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A single media record from the exported manifest
///
/// Field names mirror the JSON export produced by the hosting service:
///
/// ```json
/// {
///   "Date": "2023-06-01 14:30:00",
///   "Media Type": "Image",
///   "Download Link": "https://app.example.com/dmd/memories?uid=..."
/// }
/// ```
///
/// Records are immutable once loaded; the dispatcher owns the full list and
/// each record is moved into exactly one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRecord {
    /// Original capture timestamp, `YYYY-MM-DD HH:MM:SS`
    #[serde(rename = "Date")]
    pub timestamp: String,

    /// Raw media-type string as exported
    #[serde(rename = "Media Type")]
    pub media_type: String,

    /// Opaque per-item link; POSTing to it yields the direct download URL
    #[serde(rename = "Download Link")]
    pub source_link: String,
}

impl MediaRecord {
    /// Classified media kind for this record
    pub fn kind(&self) -> MediaKind {
        MediaKind::classify(&self.media_type)
    }
}

/// Composite unit of work pushed through the task channel
///
/// The id and record travel together as one value so concurrent consumers can
/// never observe a mismatched pairing. Ids are dense over
/// `[0, record_count)` in manifest order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Stable order-of-appearance identifier
    pub id: u64,
    /// The record to download
    pub record: MediaRecord,
}

impl Task {
    /// Create a task pairing an id with its record
    pub fn new(id: u64, record: MediaRecord) -> Self {
        Self { id, record }
    }
}
