//! Error types for helper-core.
//!
//! No external dependencies - implements `std::error::Error` manually.
//! Errors are `Clone + Eq` so they can be handed across threads and compared
//! in tests; I/O failures are captured as their kind plus message.
//!
//! # Error Categories
//!
//! - **Checksum errors**: `SourceRead`, `CrcMismatch`
//! - **Argument errors**: `InvalidPermits`, `InvalidPageSize`

use std::error::Error as StdError;
use std::fmt;
use std::io;

/// Result type alias for helper-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during helper-core operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ==================== Checksum Errors ====================
    /// The byte source could not supply further data.
    ///
    /// Raised for closed handles, I/O faults or broken connections.
    /// The checksum computation is abandoned.
    SourceRead {
        /// Kind of the underlying I/O error.
        kind: io::ErrorKind,
        /// Message of the underlying I/O error.
        message: String,
    },

    /// CRC checksum verification failed.
    CrcMismatch {
        /// Expected CRC value.
        expected: u32,
        /// Actual computed CRC value.
        actual: u32,
    },

    // ==================== Argument Errors ====================
    /// A semaphore needs at least one permit.
    InvalidPermits,

    /// Page size must be non-zero.
    InvalidPageSize,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SourceRead { kind, message } => {
                write!(f, "source read failure ({:?}): {}", kind, message)
            }
            Error::CrcMismatch { expected, actual } => {
                write!(
                    f,
                    "CRC mismatch: expected {:#010x}, got {:#010x}",
                    expected, actual
                )
            }
            Error::InvalidPermits => write!(f, "semaphore needs at least one permit"),
            Error::InvalidPageSize => write!(f, "page size cannot be zero"),
        }
    }
}

impl StdError for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::SourceRead {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
