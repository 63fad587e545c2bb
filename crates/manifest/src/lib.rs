//! Persisted upload manifest.
//!
//! The manifest is a single JSON array of entries, one per uploaded
//! attachment, in upload order. It is loaded in full and rewritten in full
//! on every append. There is no locking: the store assumes a single
//! process, and concurrent writers may lose each other's appends.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One record per uploaded attachment (a chunk or a whole small file).
///
/// `message_id` is the opaque handle issued by the messaging platform and
/// is the only thing needed to retrieve the bytes later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub message_id: i64,
    pub filename: String,
    pub size: i64,
    pub date: DateTime<Utc>,
}

/// Errors produced by the manifest store.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("manifest parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Append-only manifest persisted at a fixed path.
pub struct ManifestStore {
    path: PathBuf,
}

impl ManifestStore {
    /// Creates a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the manifest file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the ordered entry sequence.
    ///
    /// A missing file yields an empty sequence. An existing file that is
    /// not a valid JSON array of entries is a parse error.
    pub fn load(&self) -> Result<Vec<ManifestEntry>, ManifestError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let entries = serde_json::from_str(&content)?;
        Ok(entries)
    }

    /// Appends `entries` and rewrites the manifest file in full.
    ///
    /// Read-modify-write with no locking; the relative order of `entries`
    /// is preserved at the end of the stored sequence. Returns the combined
    /// sequence as written.
    pub fn append(&self, entries: &[ManifestEntry]) -> Result<Vec<ManifestEntry>, ManifestError> {
        let mut combined = self.load()?;
        combined.extend_from_slice(entries);

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&combined)?;
        std::fs::write(&self.path, content)?;

        tracing::debug!(
            path = %self.path.display(),
            appended = entries.len(),
            total = combined.len(),
            "manifest written"
        );
        Ok(combined)
    }
}
