//! Configuration for the helper tools.
//!
//! All configuration is loaded from environment variables (a `.env` file is
//! read first by the binary). Every field has a default.

use std::time::Duration;

/// Default read size for checksumming files (bytes)
pub const DEFAULT_READ_BUFFER: usize = 1024;

/// Start of the IANA dynamic port range
pub const DEFAULT_PORT_RANGE_START: u16 = 49152;

/// Tools configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Read size used when checksumming files
    pub read_buffer_size: usize,

    // === Port discovery ===
    /// First port probed by `free_port_in_range` (inclusive)
    pub port_range_start: u16,

    /// Last port probed by `free_port_in_range` (exclusive)
    pub port_range_end: u16,

    // === Connectivity probe ===
    /// Host name resolved to decide whether the internet is reachable
    pub probe_host: String,

    /// Give up on the probe after this long (default: 3 seconds)
    pub probe_timeout: Duration,

    // === File helpers ===
    /// Overwrite existing files when copying directories (default: true)
    pub copy_overwrite: bool,

    /// Break base64 output into 76 character lines (default: true)
    pub base64_line_breaks: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            read_buffer_size: std::env::var("HELPER_READ_BUFFER")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(DEFAULT_READ_BUFFER),

            port_range_start: std::env::var("HELPER_PORT_RANGE_START")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT_RANGE_START),
            port_range_end: std::env::var("HELPER_PORT_RANGE_END")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(u16::MAX),

            probe_host: std::env::var("HELPER_PROBE_HOST")
                .unwrap_or_else(|_| "www.google.com".to_string()),
            probe_timeout: Duration::from_secs(
                std::env::var("HELPER_PROBE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(3),
            ),

            copy_overwrite: flag("HELPER_COPY_OVERWRITE", true),
            base64_line_breaks: flag("HELPER_BASE64_LINE_BREAKS", true),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Read a boolean flag: `true`/`1` enable, `false`/`0` disable.
fn flag(name: &str, default: bool) -> bool {
    match std::env::var(name).as_deref() {
        Ok("true" | "1") => true,
        Ok("false" | "0") => false,
        _ => default,
    }
}
