//! Splitting a file into fixed-size part files.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::{ChunkError, PART_INDEX_WIDTH};

/// Returns the path of part `index` for `source`.
///
/// The part name is the full source path with a `.part<i>` suffix, where
/// the index is zero-padded to [`PART_INDEX_WIDTH`] digits.
pub fn part_path(source: &Path, index: usize) -> PathBuf {
    let mut name = source.as_os_str().to_os_string();
    name.push(format!(".part{index:0width$}", width = PART_INDEX_WIDTH));
    PathBuf::from(name)
}

/// Splits `source` into sequential part files of at most `chunk_size` bytes.
///
/// Reads proceed strictly from the start of the file; each part is fully
/// written, flushed and closed before the next read begins. Every part is
/// exactly `chunk_size` bytes except possibly the last. An empty source
/// produces no parts. The source file itself is left untouched.
///
/// A failure mid-split leaves already-written parts on disk.
pub fn split_file(source: &Path, chunk_size: u64) -> Result<Vec<PathBuf>, ChunkError> {
    if chunk_size == 0 {
        return Err(ChunkError::InvalidChunkSize(chunk_size));
    }

    let mut src = File::open(source)?;
    let total = src.metadata()?.len();

    let mut parts = Vec::new();
    let mut written: u64 = 0;
    let mut index = 0usize;

    while written < total {
        let path = part_path(source, index);
        let mut out = File::create(&path)?;
        let n = std::io::copy(&mut (&mut src).take(chunk_size), &mut out)?;
        out.flush()?;
        drop(out);

        tracing::debug!(part = %path.display(), bytes = n, "wrote part file");
        parts.push(path);
        written += n;
        index += 1;
    }

    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, data).unwrap();
        path
    }

    #[test]
    fn part_path_is_zero_padded() {
        let p = part_path(Path::new("/tmp/video.mkv"), 7);
        assert_eq!(p, PathBuf::from("/tmp/video.mkv.part007"));

        let p = part_path(Path::new("/tmp/video.mkv"), 123);
        assert_eq!(p, PathBuf::from("/tmp/video.mkv.part123"));
    }

    #[test]
    fn split_exact_multiple() {
        let dir = TempDir::new().unwrap();
        let src = create_test_file(dir.path(), "data.bin", &[0xABu8; 8]);

        let parts = split_file(&src, 4).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(std::fs::read(&parts[0]).unwrap().len(), 4);
        assert_eq!(std::fs::read(&parts[1]).unwrap().len(), 4);
    }

    #[test]
    fn split_with_remainder() {
        let dir = TempDir::new().unwrap();
        let src = create_test_file(dir.path(), "data.bin", b"0123456789");

        let parts = split_file(&src, 4).unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(std::fs::read(&parts[0]).unwrap(), b"0123");
        assert_eq!(std::fs::read(&parts[1]).unwrap(), b"4567");
        assert_eq!(std::fs::read(&parts[2]).unwrap(), b"89");
    }

    #[test]
    fn split_smaller_than_chunk() {
        let dir = TempDir::new().unwrap();
        let src = create_test_file(dir.path(), "data.bin", b"tiny");

        let parts = split_file(&src, 1024).unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(std::fs::read(&parts[0]).unwrap(), b"tiny");
    }

    #[test]
    fn split_empty_file_produces_no_parts() {
        let dir = TempDir::new().unwrap();
        let src = create_test_file(dir.path(), "empty.bin", b"");

        let parts = split_file(&src, 4).unwrap();
        assert!(parts.is_empty());
    }

    #[test]
    fn split_leaves_source_untouched() {
        let dir = TempDir::new().unwrap();
        let src = create_test_file(dir.path(), "data.bin", b"0123456789");

        split_file(&src, 3).unwrap();
        assert_eq!(std::fs::read(&src).unwrap(), b"0123456789");
    }

    #[test]
    fn split_is_idempotent_on_naming() {
        let dir = TempDir::new().unwrap();
        let src = create_test_file(dir.path(), "data.bin", b"0123456789");

        let first = split_file(&src, 4).unwrap();
        let second = split_file(&src, 4).unwrap();
        assert_eq!(first, second);

        let sizes: Vec<u64> = second
            .iter()
            .map(|p| std::fs::metadata(p).unwrap().len())
            .collect();
        assert_eq!(sizes, vec![4, 4, 2]);
    }

    #[test]
    fn split_zero_chunk_size_rejected() {
        let dir = TempDir::new().unwrap();
        let src = create_test_file(dir.path(), "data.bin", b"x");

        let result = split_file(&src, 0);
        assert!(matches!(result, Err(ChunkError::InvalidChunkSize(0))));
    }

    #[test]
    fn split_missing_source_errors() {
        let result = split_file(Path::new("/nonexistent/file.bin"), 4);
        assert!(matches!(result, Err(ChunkError::Io(_))));
    }

    #[test]
    fn split_five_million_bytes_at_two_million() {
        let dir = TempDir::new().unwrap();
        let data = vec![0x5Au8; 5_000_000];
        let src = create_test_file(dir.path(), "big.bin", &data);

        let parts = split_file(&src, 2_000_000).unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(std::fs::metadata(&parts[0]).unwrap().len(), 2_000_000);
        assert_eq!(std::fs::metadata(&parts[1]).unwrap().len(), 2_000_000);
        assert_eq!(std::fs::metadata(&parts[2]).unwrap().len(), 1_000_000);
    }
}
