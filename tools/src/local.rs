//! Local machine paths.

use crate::error::Result;
use std::path::PathBuf;
#[cfg(target_os = "linux")]
use {std::fs, tracing::debug};

/// Per-user temporary directory.
///
/// On Linux this is `<temp>/<euid>`, created if missing, so users sharing
/// `/tmp` do not collide. Elsewhere it is the system temp directory.
pub fn user_temp_path() -> Result<PathBuf> {
    let base = std::env::temp_dir();

    #[cfg(target_os = "linux")]
    {
        let path = base.join(effective_uid()?.to_string());
        if !path.is_dir() {
            fs::create_dir_all(&path)?;
            debug!(path = %path.display(), "Created user temp directory");
        }
        Ok(path)
    }

    #[cfg(not(target_os = "linux"))]
    {
        Ok(base)
    }
}

/// Effective uid of this process (the owner of `/proc/self`).
#[cfg(target_os = "linux")]
pub fn effective_uid() -> Result<u32> {
    use std::os::unix::fs::MetadataExt;
    Ok(fs::metadata("/proc/self")?.uid())
}
