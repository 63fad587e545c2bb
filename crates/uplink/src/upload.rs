//! Upload pipeline: stage, send, record, clean up.
//!
//! Two-phase by design: first every item is sent and the manifest batch is
//! appended in one call, then local files are deleted best-effort. A
//! failure in the transfer phase leaves the manifest and local files
//! untouched.

use std::path::{Path, PathBuf};

use chatvault_chunk::split_file;
use chatvault_manifest::{ManifestEntry, ManifestStore};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::client::MessengerClient;
use crate::error::UplinkError;

/// Progress and status events emitted during an upload batch.
#[derive(Debug, Clone)]
pub enum TransferEvent {
    /// The work list has been staged.
    Started { files: usize, total_bytes: u64 },
    /// Cumulative bytes transferred across the batch.
    Progress {
        filename: String,
        transferred: u64,
        total_bytes: u64,
    },
    /// One item was accepted by the platform.
    Sent { filename: String, message_id: i64 },
    /// The batch is recorded and local cleanup has run.
    Completed { uploaded: usize },
}

/// One staged item: a whole small file or a single chunk.
#[derive(Debug, Clone)]
struct WorkItem {
    path: PathBuf,
    size: u64,
}

/// Uploads the files of a directory to one messaging channel.
pub struct Uploader<'a> {
    client: &'a dyn MessengerClient,
    target: String,
    chunk_size: u64,
}

impl<'a> Uploader<'a> {
    /// Creates an uploader sending to `target` with the given chunk limit.
    pub fn new(client: &'a dyn MessengerClient, target: impl Into<String>, chunk_size: u64) -> Self {
        Self {
            client,
            target: target.into(),
            chunk_size,
        }
    }

    /// Runs the full upload pipeline over the immediate files of `dir`.
    ///
    /// Files larger than the chunk limit are replaced in the work list by
    /// their split parts. Items are sent strictly one at a time; after the
    /// whole batch is sent it is appended to `store` in a single call, and
    /// only then are the uploaded files (and any split sources) deleted.
    /// Returns the new manifest entries in upload order.
    pub async fn upload_dir(
        &self,
        dir: &Path,
        store: &ManifestStore,
        events_tx: &mpsc::Sender<TransferEvent>,
    ) -> Result<Vec<ManifestEntry>, UplinkError> {
        let (items, split_sources) = stage_files(dir, self.chunk_size)?;
        let total_bytes: u64 = items.iter().map(|i| i.size).sum();

        let _ = events_tx
            .send(TransferEvent::Started {
                files: items.len(),
                total_bytes,
            })
            .await;

        let mut new_entries = Vec::with_capacity(items.len());
        let mut batch_transferred: u64 = 0;

        for item in &items {
            let filename = base_name(&item.path);

            let tx = events_tx.clone();
            let progress_name = filename.clone();
            let base = batch_transferred;
            let progress = move |current: u64, _item_total: u64| {
                // Per-byte ticks are lossy: a full channel drops them.
                let _ = tx.try_send(TransferEvent::Progress {
                    filename: progress_name.clone(),
                    transferred: base + current,
                    total_bytes,
                });
            };

            let sent = self
                .client
                .send_file(&self.target, &item.path, &filename, &progress)
                .await?;

            batch_transferred += item.size;
            info!(file = %item.path.display(), message_id = sent.id, "uploaded");

            let _ = events_tx
                .send(TransferEvent::Sent {
                    filename: filename.clone(),
                    message_id: sent.id,
                })
                .await;

            new_entries.push(ManifestEntry {
                message_id: sent.id,
                filename,
                size: item.size as i64,
                date: sent.date,
            });
        }

        store.append(&new_entries)?;

        // Cleanup phase: uploaded items plus the sources that were split.
        for path in items.iter().map(|i| &i.path).chain(split_sources.iter()) {
            if let Err(e) = std::fs::remove_file(path) {
                warn!(file = %path.display(), error = %e, "failed to delete local file");
            }
        }

        let _ = events_tx
            .send(TransferEvent::Completed {
                uploaded: new_entries.len(),
            })
            .await;

        Ok(new_entries)
    }
}

/// Builds the work list for `dir`.
///
/// Immediate files only, sorted lexicographically by file name so the
/// upload order is reproducible. A file above the chunk limit contributes
/// its split parts instead of itself; its path is returned separately so
/// the caller can delete it after a successful batch.
fn stage_files(dir: &Path, chunk_size: u64) -> Result<(Vec<WorkItem>, Vec<PathBuf>), UplinkError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let metadata = entry.metadata()?;
        if metadata.is_file() {
            files.push((entry.path(), metadata.len()));
        }
    }
    files.sort_by(|a, b| a.0.file_name().cmp(&b.0.file_name()));

    let mut items = Vec::new();
    let mut split_sources = Vec::new();

    for (path, size) in files {
        if size > chunk_size {
            for part in split_file(&path, chunk_size)? {
                let part_size = std::fs::metadata(&part)?.len();
                items.push(WorkItem {
                    path: part,
                    size: part_size,
                });
            }
            split_sources.push(path);
        } else {
            items.push(WorkItem { path, size });
        }
    }

    Ok((items, split_sources))
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
