//! Manifest loading for Memories Fetcher
//!
//! The hosting service's export ships a JSON file listing every saved media
//! item. This module materializes that file into an ordered `Vec<MediaRecord>`
//! before the pipeline starts; the core treats the manifest as already loaded
//! and never touches the file again.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::app::models::{MediaKind, MediaRecord};
use crate::errors::ManifestError;

/// Top-level structure of the exported manifest file
#[derive(Debug, Deserialize)]
struct ManifestFile {
    #[serde(rename = "Saved Media")]
    saved_media: Vec<MediaRecord>,
}

/// Aggregate counts over a loaded manifest, for `manifest info` and logging
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestStats {
    pub total: usize,
    pub images: usize,
    pub videos: usize,
    pub unknown: usize,
}

impl ManifestStats {
    /// Compute stats over a slice of records
    pub fn from_records(records: &[MediaRecord]) -> Self {
        let mut stats = Self {
            total: records.len(),
            ..Self::default()
        };
        for record in records {
            match record.kind() {
                MediaKind::Image => stats.images += 1,
                MediaKind::Video => stats.videos += 1,
                MediaKind::Unknown => stats.unknown += 1,
            }
        }
        stats
    }
}

impl std::fmt::Display for ManifestStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} records ({} images, {} videos, {} unknown)",
            self.total, self.images, self.videos, self.unknown
        )
    }
}

/// Load and parse a manifest file into an ordered record list
///
/// Record order is preserved as task ids are assigned by position. An empty
/// `Saved Media` array is treated as an error so the pipeline is never
/// started over nothing.
pub fn load_manifest(path: &Path) -> Result<Vec<MediaRecord>, ManifestError> {
    if !path.exists() {
        return Err(ManifestError::NotFound {
            path: path.to_path_buf(),
        });
    }

    debug!("Reading manifest from {}", path.display());
    let contents = std::fs::read_to_string(path)?;
    let manifest: ManifestFile = serde_json::from_str(&contents)?;

    if manifest.saved_media.is_empty() {
        return Err(ManifestError::Empty {
            path: path.to_path_buf(),
        });
    }

    let stats = ManifestStats::from_records(&manifest.saved_media);
    info!("Loaded manifest: {}", stats);

    Ok(manifest.saved_media)
}

/// Resolve the manifest path from an optional CLI override
pub fn resolve_manifest_path(override_path: Option<&Path>) -> PathBuf {
    override_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(crate::constants::manifest::DEFAULT_MANIFEST_PATH))
}
