//! Merging part files back into a single file.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::ChunkError;

/// Returns the part files directly inside `dir`, sorted by file name.
///
/// A file qualifies when its name contains `.part`. The lexicographic sort
/// is what orders the parts, which is correct because the splitter
/// zero-pads the index to a fixed width.
pub fn collect_parts(dir: &Path) -> Result<Vec<PathBuf>, ChunkError> {
    let mut parts = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.metadata()?.is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().contains(".part") {
            parts.push(entry.path());
        }
    }

    parts.sort();
    Ok(parts)
}

/// Concatenates `parts` into `output` in ascending filename order, then
/// deletes the part files.
///
/// The output is fully written, flushed and closed before any part is
/// deleted. Deletion is best-effort: individual failures are logged and do
/// not abort the merge. A read failure mid-merge aborts and may leave a
/// truncated output on disk.
pub fn merge_chunks(output: &Path, parts: &[PathBuf]) -> Result<(), ChunkError> {
    let mut ordered: Vec<&PathBuf> = parts.iter().collect();
    ordered.sort();

    let mut out = File::create(output)?;
    for part in &ordered {
        let mut src = File::open(part)?;
        std::io::copy(&mut src, &mut out)?;
    }
    out.flush()?;
    drop(out);

    tracing::info!(output = %output.display(), parts = ordered.len(), "merge complete");

    for part in &ordered {
        if let Err(e) = std::fs::remove_file(part) {
            tracing::warn!(part = %part.display(), error = %e, "failed to delete part file");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::split_file;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, data).unwrap();
        path
    }

    #[test]
    fn collect_parts_sorted() {
        let dir = TempDir::new().unwrap();
        create_test_file(dir.path(), "a.bin.part002", b"2");
        create_test_file(dir.path(), "a.bin.part000", b"0");
        create_test_file(dir.path(), "a.bin.part001", b"1");
        create_test_file(dir.path(), "unrelated.txt", b"x");

        let parts = collect_parts(dir.path()).unwrap();
        let names: Vec<String> = parts
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["a.bin.part000", "a.bin.part001", "a.bin.part002"]
        );
    }

    #[test]
    fn collect_parts_ignores_directories() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sub.part000")).unwrap();
        create_test_file(dir.path(), "a.bin.part000", b"0");

        let parts = collect_parts(dir.path()).unwrap();
        assert_eq!(parts.len(), 1);
    }

    #[test]
    fn merge_concatenates_in_name_order() {
        let dir = TempDir::new().unwrap();
        let p0 = create_test_file(dir.path(), "f.part000", b"AAAA");
        let p1 = create_test_file(dir.path(), "f.part001", b"BBBB");
        let p2 = create_test_file(dir.path(), "f.part002", b"CC");

        let out = dir.path().join("merged.bin");
        // Deliberately out of order: merge must sort by filename.
        merge_chunks(&out, &[p2.clone(), p0.clone(), p1.clone()]).unwrap();

        assert_eq!(std::fs::read(&out).unwrap(), b"AAAABBBBCC");
    }

    #[test]
    fn merge_deletes_parts() {
        let dir = TempDir::new().unwrap();
        let p0 = create_test_file(dir.path(), "f.part000", b"AA");
        let p1 = create_test_file(dir.path(), "f.part001", b"BB");

        let out = dir.path().join("merged.bin");
        merge_chunks(&out, &[p0.clone(), p1.clone()]).unwrap();

        assert!(!p0.exists());
        assert!(!p1.exists());
        assert!(out.exists());
    }

    #[test]
    fn merge_missing_part_errors() {
        let dir = TempDir::new().unwrap();
        let p0 = create_test_file(dir.path(), "f.part000", b"AA");
        let missing = dir.path().join("f.part001");

        let out = dir.path().join("merged.bin");
        let result = merge_chunks(&out, &[p0.clone(), missing]);
        assert!(result.is_err());
        // Existing parts are not deleted on failure.
        assert!(p0.exists());
    }

    #[test]
    fn split_merge_roundtrip() {
        let dir = TempDir::new().unwrap();
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let src = create_test_file(dir.path(), "data.bin", &data);

        let parts = split_file(&src, 1_000).unwrap();
        assert_eq!(parts.len(), 10);

        let out = dir.path().join("restored.bin");
        merge_chunks(&out, &parts).unwrap();

        assert_eq!(std::fs::read(&out).unwrap(), data);
        for part in &parts {
            assert!(!part.exists());
        }
    }

    #[test]
    fn split_merge_roundtrip_five_million() {
        let dir = TempDir::new().unwrap();
        let data: Vec<u8> = (0..5_000_000u32).map(|i| (i % 253) as u8).collect();
        let src = create_test_file(dir.path(), "big.bin", &data);

        let parts = split_file(&src, 2_000_000).unwrap();
        assert_eq!(parts.len(), 3);

        let out = dir.path().join("restored.bin");
        merge_chunks(&out, &parts).unwrap();

        let restored = std::fs::read(&out).unwrap();
        assert_eq!(restored.len(), 5_000_000);
        assert_eq!(restored, data);
        for part in &parts {
            assert!(!part.exists());
        }
    }
}
