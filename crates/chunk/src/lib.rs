//! Fixed-size file chunking.
//!
//! A large file is split into numbered part files
//! (`movie.mkv.part000`, `movie.mkv.part001`, ...) that each hold one
//! contiguous byte range of the source. Concatenating the parts in
//! ascending filename order reproduces the source exactly.

mod merge;
mod split;

pub use merge::{collect_parts, merge_chunks};
pub use split::{part_path, split_file};

/// Default chunk size: 2 GB, just under common attachment ceilings.
pub const DEFAULT_CHUNK_SIZE: u64 = 2 * 1000 * 1000 * 1000;

/// Width of the zero-padded part index in file names.
///
/// Part files sort lexicographically, so the index must be fixed-width.
pub const PART_INDEX_WIDTH: usize = 3;

/// Errors produced by the chunk crate.
#[derive(Debug, thiserror::Error)]
pub enum ChunkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("chunk size must be positive, got {0}")]
    InvalidChunkSize(u64),
}
