//! helper-core - CRC-32 checksum and small synchronisation helpers.
//!
//! This library provides:
//! - CRC-32 (ISO-HDLC, reflected polynomial `0xEDB88320`) over any reader
//! - A counting semaphore with RAII tickets
//! - A stopwatch with `HHh:MMm:SSs:mmmms` formatting
//! - Parallel while-loops on scoped threads
//! - Fraction and page-count helpers
//!
//! # Constraints
//!
//! This library intentionally does NOT:
//! - Access the network
//! - Open files (callers hand in readers)
//! - Log anything
//! - Hold mutable global state
//!
//! # Example: Checksum a stream from several threads
//!
//! ```
//! use helper_core::Crc32;
//! use std::thread;
//!
//! let crc = Crc32::new();
//! let (a, b) = thread::scope(|s| {
//!     let a = s.spawn(|| crc.compute(&b"123456789"[..]).unwrap());
//!     let b = s.spawn(|| crc.compute(&b""[..]).unwrap());
//!     (a.join().unwrap(), b.join().unwrap())
//! });
//!
//! assert_eq!(a, 0xCBF43926);
//! assert_eq!(b, 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod crc;
pub mod error;
pub mod paging;
pub mod parallel;
pub mod semaphore;
pub mod stopwatch;

// Re-export main types at crate root
pub use crc::{Crc32, Digest, DEFAULT_CHUNK_SIZE, POLYNOMIAL};
pub use error::{Error, Result};
pub use parallel::{
    execute_parallel, execute_parallel_with, parallel_map, parallel_map_with, parallel_while,
    parallel_while_with, LoopState, Task,
};
pub use semaphore::{Semaphore, Ticket};
pub use stopwatch::Stopwatch;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
