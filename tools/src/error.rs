//! Error type for the helper tools.

use std::io;
use std::path::PathBuf;

/// Result type alias for helper-tools operations.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Tool errors
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("{}: not found", .0.display())]
    SourceNotFound(PathBuf),

    #[error("{}: already exists", .0.display())]
    TargetExists(PathBuf),

    #[error("{}: target lies inside the source directory", .0.display())]
    TargetInsideSource(PathBuf),

    #[error("no free port in range {start}..{end}")]
    NoFreePort { start: u16, end: u16 },

    #[error("invalid range: {min}..{max}")]
    InvalidRange { min: i64, max: i64 },

    #[error(transparent)]
    Core(#[from] helper_core::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("XML write error: {0}")]
    XmlWrite(#[from] quick_xml::se::SeError),

    #[error("XML read error: {0}")]
    XmlRead(#[from] quick_xml::de::DeError),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}
