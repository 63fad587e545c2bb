//! Download pipeline: select a manifest entry, fetch it, save it.

use std::path::{Path, PathBuf};

use chatvault_manifest::ManifestStore;
use tracing::info;

use crate::client::MessengerClient;
use crate::error::UplinkError;

/// Downloads previously uploaded attachments from one messaging channel.
pub struct Downloader<'a> {
    client: &'a dyn MessengerClient,
    target: String,
}

impl<'a> Downloader<'a> {
    /// Creates a downloader fetching from `target`.
    pub fn new(client: &'a dyn MessengerClient, target: impl Into<String>) -> Self {
        Self {
            client,
            target: target.into(),
        }
    }

    /// Fetches the manifest entry at `index` and saves its bytes under the
    /// recorded filename inside `downloads_dir`.
    ///
    /// An out-of-range index is an error and a no-op: the manifest is never
    /// modified and nothing touches the filesystem. Returns the path of the
    /// saved file.
    pub async fn fetch_entry(
        &self,
        store: &ManifestStore,
        index: usize,
        downloads_dir: &Path,
    ) -> Result<PathBuf, UplinkError> {
        let entries = store.load()?;
        let entry = entries.get(index).ok_or(UplinkError::InvalidSelection {
            index,
            len: entries.len(),
        })?;
        validate_entry_filename(&entry.filename)?;

        let bytes = self
            .client
            .fetch_attachment(&self.target, entry.message_id)
            .await?;

        std::fs::create_dir_all(downloads_dir)?;
        let out = downloads_dir.join(&entry.filename);
        tokio::fs::write(&out, &bytes).await?;

        info!(file = %out.display(), bytes = bytes.len(), "attachment saved");
        Ok(out)
    }
}

/// Rejects manifest filenames that would escape the downloads directory.
///
/// The manifest is a plain local file anyone can edit; a filename is only
/// ever joined as a single path component.
fn validate_entry_filename(name: &str) -> Result<(), UplinkError> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
    {
        return Err(UplinkError::InvalidFilename(name.to_string()));
    }
    Ok(())
}
