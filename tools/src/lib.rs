//! # helper-tools
//!
//! Host-facing helpers built on `helper-core`.
//!
//! ## Design Principles
//!
//! - **Stream, don't slurp**: file checksums read in fixed-size chunks
//! - **One table**: every checksum, on every thread, uses `Crc32::shared()`
//! - **Fail loudly**: I/O errors propagate; no half-computed values
//! - **Minimal logging**: paths and counts only, never file contents
//!
//! ## Modules
//!
//! | Module | Provides |
//! |--------|----------|
//! | [`checksum`] | CRC-32 of files, single or in parallel |
//! | [`fs`] | Recursive copy, clearing directories, base64 file conversion |
//! | [`json`] | JSON strings and files |
//! | [`xml`] | XML strings and files |
//! | [`compress`] | GZip buffers and streams, Zip extraction |
//! | [`network`] | Host name, local IP, interfaces and MACs, free ports, connectivity |
//! | [`random`] | Random integers in a range |
//! | [`digest`] | MD5 and SHA-256 of strings, digest format checks |
//! | [`local`] | Per-user temp directory |

pub mod checksum;
pub mod compress;
pub mod config;
pub mod digest;
pub mod error;
pub mod fs;
pub mod json;
pub mod local;
pub mod network;
pub mod random;
pub mod xml;

pub use config::Config;
pub use error::{Result, ToolError};
pub use helper_core::Crc32;

/// Initialize tracing with environment-based log levels.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("helper_tools=info,helper=info")),
        )
        .try_init();
}
