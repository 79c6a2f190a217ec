//! CRC-32 checksums of files.
//!
//! Files are streamed through the shared [`Crc32`] table in fixed-size
//! reads; nothing is loaded into memory whole.

use crate::config::DEFAULT_READ_BUFFER;
use crate::error::{Result, ToolError};
use helper_core::parallel::{default_workers, parallel_map_with};
use helper_core::Crc32;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// CRC-32 of the file at `path`.
pub fn file_crc(path: impl AsRef<Path>) -> Result<u32> {
    file_crc_with(Crc32::shared(), path, DEFAULT_READ_BUFFER)
}

/// CRC-32 of the file at `path` using `crc` and reads of `chunk_size` bytes.
pub fn file_crc_with(crc: &Crc32, path: impl AsRef<Path>, chunk_size: usize) -> Result<u32> {
    let path = path.as_ref();
    let file = open(path)?;
    let value = crc.compute_chunked(file, chunk_size)?;

    debug!(path = %path.display(), crc = %format_crc(value), "Computed file CRC");
    Ok(value)
}

/// CRC-32 of several files on one worker per CPU.
///
/// All workers share one lookup table. Results come back in input order; a
/// failure for one file does not affect the others.
pub fn file_crcs<P>(paths: &[P], chunk_size: usize) -> Vec<(PathBuf, Result<u32>)>
where
    P: AsRef<Path> + Sync,
{
    file_crcs_with(default_workers(), paths, chunk_size)
}

/// [`file_crcs`] on at most `workers` threads, however many paths there are.
pub fn file_crcs_with<P>(
    workers: usize,
    paths: &[P],
    chunk_size: usize,
) -> Vec<(PathBuf, Result<u32>)>
where
    P: AsRef<Path> + Sync,
{
    let crc = Crc32::shared();
    parallel_map_with(workers, paths, |path| {
        let path = path.as_ref();
        (path.to_path_buf(), file_crc_with(crc, path, chunk_size))
    })
}

/// Check the file at `path` against an expected CRC-32.
pub fn verify_file(path: impl AsRef<Path>, expected: u32) -> Result<()> {
    verify_file_with(path, expected, DEFAULT_READ_BUFFER)
}

/// [`verify_file`] reading `chunk_size` bytes at a time.
pub fn verify_file_with(path: impl AsRef<Path>, expected: u32, chunk_size: usize) -> Result<()> {
    let actual = file_crc_with(Crc32::shared(), path, chunk_size)?;
    if actual != expected {
        return Err(helper_core::Error::CrcMismatch { expected, actual }.into());
    }
    Ok(())
}

/// Format a CRC-32 as 8 lowercase hex digits.
pub fn format_crc(value: u32) -> String {
    hex::encode(value.to_be_bytes())
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ToolError::SourceNotFound(path.to_path_buf()),
        _ => ToolError::Io(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_file(name: &str, contents: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "helper-crc-{}-{}",
            std::process::id(),
            name
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn known_vector_from_file() {
        let path = scratch_file("vector", b"123456789");
        assert_eq!(file_crc(&path).unwrap(), 0xCBF43926);
        assert!(verify_file(&path, 0xCBF43926).is_ok());
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn empty_file() {
        let path = scratch_file("empty", b"");
        assert_eq!(file_crc(&path).unwrap(), 0);
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_file() {
        let err = file_crc("/definitely/not/here.bin").unwrap_err();
        assert!(matches!(err, ToolError::SourceNotFound(_)));
    }

    #[test]
    fn mismatch_reported() {
        let path = scratch_file("mismatch", b"abc");
        let err = verify_file(&path, 0).unwrap_err();
        assert!(matches!(
            err,
            ToolError::Core(helper_core::Error::CrcMismatch { expected: 0, .. })
        ));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn chunk_size_does_not_matter() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 256) as u8).collect();
        let path = scratch_file("chunks", &data);
        let crc = Crc32::new();
        let expected = crc.checksum(&data);
        for size in [1, 7, 1024, 65536] {
            assert_eq!(file_crc_with(&crc, &path, size).unwrap(), expected);
        }
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn many_files_keep_order() {
        let a = scratch_file("many-a", b"123456789");
        let b = scratch_file("many-b", b"");
        let missing = PathBuf::from("/definitely/not/here.bin");

        let results = file_crcs(&[a.clone(), missing.clone(), b.clone()], 16);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, a);
        assert_eq!(*results[0].1.as_ref().unwrap(), 0xCBF43926);
        assert_eq!(results[1].0, missing);
        assert!(results[1].1.is_err());
        assert_eq!(*results[2].1.as_ref().unwrap(), 0);

        fs::remove_file(a).unwrap();
        fs::remove_file(b).unwrap();
    }

    #[test]
    fn many_files_on_one_worker() {
        let a = scratch_file("one-worker-a", b"123456789");
        let b = scratch_file("one-worker-b", b"a");

        let results = file_crcs_with(1, &[&a, &b, &a], 3);
        let values: Vec<u32> = results.into_iter().map(|(_, r)| r.unwrap()).collect();
        assert_eq!(values, [0xCBF43926, 0xE8B7BE43, 0xCBF43926]);

        fs::remove_file(a).unwrap();
        fs::remove_file(b).unwrap();
    }

    #[test]
    fn verify_with_any_chunk_size() {
        let path = scratch_file("verify-chunks", b"123456789");
        for size in [0, 1, 4, 4096] {
            assert!(verify_file_with(&path, 0xCBF43926, size).is_ok());
        }
        assert!(verify_file_with(&path, 1, 2).is_err());
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn hex_formatting() {
        assert_eq!(format_crc(0xCBF43926), "cbf43926");
        assert_eq!(format_crc(0), "00000000");
    }
}
