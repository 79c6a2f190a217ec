//! GZip and Zip helpers.
//!
//! GZip works on byte buffers or streams; Zip archives are only extracted.

use crate::error::{Result, ToolError};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::{debug, info, warn};
use zip::ZipArchive;

/// GZip-compress a buffer.
pub fn gzip(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Decompress a GZip buffer.
pub fn gunzip(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(data).read_to_end(&mut out)?;
    Ok(out)
}

/// GZip-compress everything `input` yields into `output`.
///
/// Returns the number of uncompressed bytes read.
pub fn compress_to<R: Read, W: Write>(mut input: R, output: W) -> Result<u64> {
    let mut encoder = GzEncoder::new(output, Compression::default());
    let read = io::copy(&mut input, &mut encoder)?;
    encoder.finish()?.flush()?;
    Ok(read)
}

/// Decompress the GZip stream `input` into `output`.
///
/// Returns the number of decompressed bytes written.
pub fn decompress_to<R: Read, W: Write>(input: R, mut output: W) -> Result<u64> {
    let mut decoder = GzDecoder::new(input);
    let written = io::copy(&mut decoder, &mut output)?;
    output.flush()?;
    Ok(written)
}

/// Extract the Zip archive at `archive` into `output_dir`.
///
/// Entries whose file name matches one of `exclude` (ASCII case-insensitive)
/// are skipped, as are entries that would land outside `output_dir`.
/// Existing files are replaced. Returns the number of files written.
pub fn unzip_to_folder(
    archive: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    exclude: &[&str],
) -> Result<usize> {
    let archive_path = archive.as_ref();
    let output_dir = output_dir.as_ref();
    if !archive_path.is_file() {
        return Err(ToolError::SourceNotFound(archive_path.to_path_buf()));
    }

    let mut archive = ZipArchive::new(File::open(archive_path)?)?;
    fs::create_dir_all(output_dir)?;

    let mut extracted = 0;
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let Some(relative) = entry.enclosed_name() else {
            warn!(entry = entry.name(), "Skipping zip entry with unsafe path");
            continue;
        };
        if is_excluded(&relative, exclude) {
            debug!(entry = %relative.display(), "Skipping excluded zip entry");
            continue;
        }

        let path = output_dir.join(&relative);
        if entry.is_dir() {
            fs::create_dir_all(&path)?;
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        if path.exists() {
            fs::remove_file(&path)?;
        }
        io::copy(&mut entry, &mut File::create(&path)?)?;
        extracted += 1;
    }

    info!(
        archive = %archive_path.display(),
        target = %output_dir.display(),
        files = extracted,
        "Extracted archive"
    );
    Ok(extracted)
}

fn is_excluded(path: &Path, exclude: &[&str]) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| exclude.iter().any(|e| e.eq_ignore_ascii_case(name)))
}
