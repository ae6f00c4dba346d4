//! Types for the manifest module.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Extension of the primary asset (the add-on package itself).
pub const PRIMARY_EXTENSION: &str = "vpk";

/// Extension of the preview asset (the thumbnail image).
pub const PREVIEW_EXTENSION: &str = "jpg";

/// Last-known remote metadata for one Workshop item.
///
/// Every field takes part in staleness detection. Numeric-looking values
/// (timestamps, sizes) are kept as the provider's own decimal strings and
/// compared as opaque tokens, never parsed, so that formatting differences
/// on the provider side can't produce false "unchanged" results.
///
/// Serialized field names match the manifest files written by earlier
/// releases of the tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Workshop item ID (publishedfileid).
    #[serde(rename = "ID")]
    pub id: String,
    /// Creation time as reported by the provider (unix seconds).
    #[serde(rename = "TimeCreated", default)]
    pub time_created: String,
    /// Last update time as reported by the provider (unix seconds).
    #[serde(rename = "TimeUpdated", default)]
    pub time_updated: String,
    /// Content handle of the primary asset.
    #[serde(rename = "HContentFile", default)]
    pub content_hash: String,
    /// Declared size of the primary asset in bytes.
    #[serde(rename = "HContentFileSize", default)]
    pub content_size: String,
    /// Content handle of the preview asset.
    #[serde(rename = "HContentPreview", default)]
    pub preview_hash: String,
    /// Declared size of the preview asset in bytes.
    #[serde(rename = "HContentPreviewSize", default)]
    pub preview_size: String,
}

impl ManifestEntry {
    /// Local path of the primary asset: `<prefix>/<id>.vpk`.
    pub fn primary_path(&self, prefix: &Path) -> PathBuf {
        prefix.join(format!("{}.{}", self.id, PRIMARY_EXTENSION))
    }

    /// Local path of the preview asset: `<prefix>/<id>.jpg`.
    pub fn preview_path(&self, prefix: &Path) -> PathBuf {
        prefix.join(format!("{}.{}", self.id, PREVIEW_EXTENSION))
    }

    /// Whether the primary asset's remote metadata differs from `previous`.
    pub fn content_changed(&self, previous: &ManifestEntry) -> bool {
        self.time_updated != previous.time_updated
            || self.time_created != previous.time_created
            || self.content_hash != previous.content_hash
            || self.content_size != previous.content_size
    }

    /// Whether the preview asset's remote metadata differs from `previous`.
    ///
    /// Timestamps are shared with the primary asset; hash and size are not.
    pub fn preview_changed(&self, previous: &ManifestEntry) -> bool {
        self.time_updated != previous.time_updated
            || self.time_created != previous.time_created
            || self.preview_hash != previous.preview_hash
            || self.preview_size != previous.preview_size
    }
}

/// In-memory manifest: one entry per item ID.
///
/// A `BTreeMap` keeps the serialized form sorted by ID, which makes the file
/// stable across rewrites and easy to diff.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: BTreeMap<String, ManifestEntry>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse manifest file content. Empty or whitespace-only content is an
    /// empty manifest, not an error.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::new());
        }
        serde_json::from_slice(bytes)
    }

    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn get(&self, id: &str) -> Option<&ManifestEntry> {
        self.entries.get(id)
    }

    /// Insert or replace the entry for `entry.id`.
    pub fn upsert(&mut self, entry: ManifestEntry) {
        self.entries.insert(entry.id.clone(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
