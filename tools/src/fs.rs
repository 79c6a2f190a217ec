//! Directory and file helpers.
//!
//! Recursive copy, clearing a directory, and converting files to and from
//! base64 text.

use crate::error::{Result, ToolError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use helper_core::parallel::parallel_map;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// MIME line length for base64 output.
pub const BASE64_LINE_LENGTH: usize = 76;

/// What a copy did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    /// Files copied
    pub files: u64,
    /// Directories created or reused below the target
    pub directories: u64,
    /// Bytes written
    pub bytes: u64,
}

impl CopyStats {
    fn merge(&mut self, other: CopyStats) {
        self.files += other.files;
        self.directories += other.directories;
        self.bytes += other.bytes;
    }
}

/// Copy `source` into `target` recursively.
///
/// `target` is created if needed. With `overwrite == false` an existing
/// target file aborts the copy with [`ToolError::TargetExists`]. A target
/// inside `source` is rejected with [`ToolError::TargetInsideSource`].
pub fn copy_directory(
    source: impl AsRef<Path>,
    target: impl AsRef<Path>,
    overwrite: bool,
) -> Result<CopyStats> {
    let source = source.as_ref();
    let target = target.as_ref();
    ensure_directory(source)?;
    ensure_outside(source, target)?;

    let stats = copy_tree(source, target, overwrite)?;
    info!(
        source = %source.display(),
        target = %target.display(),
        files = stats.files,
        bytes = stats.bytes,
        "Copied directory"
    );
    Ok(stats)
}

fn copy_tree(source: &Path, target: &Path, overwrite: bool) -> Result<CopyStats> {
    fs::create_dir_all(target)?;
    let mut stats = CopyStats::default();

    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let from = entry.path();
        let to = target.join(entry.file_name());

        if entry.file_type()?.is_dir() {
            stats.directories += 1;
            stats.merge(copy_tree(&from, &to, overwrite)?);
        } else {
            if !overwrite && to.exists() {
                return Err(ToolError::TargetExists(to));
            }
            stats.bytes += fs::copy(&from, &to)?;
            stats.files += 1;
        }
    }

    Ok(stats)
}

/// Copy `source` into `target`, replacing existing files.
///
/// Subdirectories are walked in order; the files of each directory are
/// copied in parallel, one worker per CPU.
pub fn copy_files_recursively(
    source: impl AsRef<Path>,
    target: impl AsRef<Path>,
) -> Result<CopyStats> {
    let source = source.as_ref();
    let target = target.as_ref();
    ensure_directory(source)?;
    ensure_outside(source, target)?;
    copy_tree_parallel(source, target)
}

fn copy_tree_parallel(source: &Path, target: &Path) -> Result<CopyStats> {
    fs::create_dir_all(target)?;
    let mut stats = CopyStats::default();
    let mut files = Vec::new();

    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let to = target.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            stats.directories += 1;
            stats.merge(copy_tree_parallel(&entry.path(), &to)?);
        } else {
            files.push((entry.path(), to));
        }
    }

    for copied in parallel_map(&files, |(from, to)| replace_file(from, to)) {
        stats.bytes += copied?;
        stats.files += 1;
    }

    debug!(directory = %source.display(), files = stats.files, "Copied directory level");
    Ok(stats)
}

fn replace_file(from: &Path, to: &Path) -> io::Result<u64> {
    if to.exists() {
        fs::remove_file(to)?;
    }
    fs::copy(from, to)
}

/// Remove everything inside `path`, keeping the directory itself.
pub fn clear_directory(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    ensure_directory(path)?;

    for entry in fs::read_dir(path)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(entry.path())?;
        } else {
            fs::remove_file(entry.path())?;
        }
    }

    debug!(path = %path.display(), "Cleared directory");
    Ok(())
}

/// Whether the final component of `path` is a dot-file.
pub fn is_hidden(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.') && name != "." && name != "..")
}

/// Read a file and encode it as base64.
///
/// With `line_breaks`, the output is split into lines of
/// [`BASE64_LINE_LENGTH`] characters separated by `\r\n`.
pub fn file_to_base64(path: impl AsRef<Path>, line_breaks: bool) -> Result<String> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(ToolError::SourceNotFound(path.to_path_buf()));
    }

    let encoded = STANDARD.encode(fs::read(path)?);
    if !line_breaks {
        return Ok(encoded);
    }

    // base64 output is ASCII, so byte chunks are valid UTF-8
    let lines: Vec<&str> = encoded
        .as_bytes()
        .chunks(BASE64_LINE_LENGTH)
        .filter_map(|line| std::str::from_utf8(line).ok())
        .collect();
    Ok(lines.join("\r\n"))
}

/// Decode base64 text into a file.
///
/// Whitespace (including line breaks) is ignored. Empty input writes
/// nothing. An existing file is replaced only with `overwrite`.
pub fn base64_to_file(data: &str, path: impl AsRef<Path>, overwrite: bool) -> Result<()> {
    let path = path.as_ref();
    let compact: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Ok(());
    }

    let bytes = STANDARD.decode(compact)?;
    if path.exists() {
        if !overwrite {
            return Err(ToolError::TargetExists(path.to_path_buf()));
        }
        fs::remove_file(path)?;
    }

    fs::write(path, &bytes)?;
    debug!(path = %path.display(), bytes = bytes.len(), "Wrote decoded file");
    Ok(())
}

/// Refuse copies whose target is `source` itself or lies below it; the walk
/// would otherwise pick up its own output.
fn ensure_outside(source: &Path, target: &Path) -> Result<()> {
    let source = fs::canonicalize(source)?;
    let target = resolve(target)?;
    if target.starts_with(&source) {
        return Err(ToolError::TargetInsideSource(target));
    }
    Ok(())
}

/// Absolute form of a path that may not exist yet: the deepest existing
/// ancestor is canonicalized and the missing components are re-attached.
fn resolve(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut existing = absolute.as_path();
    let mut missing = Vec::new();
    loop {
        if let Ok(base) = fs::canonicalize(existing) {
            return Ok(missing.iter().rev().fold(base, |acc, part| acc.join(part)));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return Ok(absolute),
        }
    }
}

fn ensure_directory(path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(ToolError::SourceNotFound(PathBuf::from(path)));
    }
    Ok(())
}
