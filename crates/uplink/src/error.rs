//! Uplink error types.

/// Errors produced during upload/download orchestration.
#[derive(Debug, thiserror::Error)]
pub enum UplinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("chunk error: {0}")]
    Chunk(#[from] chatvault_chunk::ChunkError),

    #[error("manifest error: {0}")]
    Manifest(#[from] chatvault_manifest::ManifestError),

    #[error("messenger error: {0}")]
    Messenger(String),

    #[error("invalid selection {index}: manifest has {len} entries")]
    InvalidSelection { index: usize, len: usize },

    #[error("invalid filename in manifest entry: {0:?}")]
    InvalidFilename(String),
}
