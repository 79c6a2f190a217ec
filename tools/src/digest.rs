//! String digests and digest format checks.

use md5::{Digest as _, Md5};
use ring::digest::{digest, SHA256};

/// Hex length of an MD5 digest
pub const MD5_HEX_LEN: usize = 32;

/// Hex length of a SHA-256 digest
pub const SHA256_HEX_LEN: usize = 64;

/// MD5 of the UTF-8 bytes of `text`, as 32 lowercase hex digits
pub fn md5_hex(text: &str) -> String {
    hex::encode(Md5::digest(text.as_bytes()))
}

/// SHA-256 of the UTF-8 bytes of `text`, hex-encoded
pub fn sha256_hex(text: &str) -> String {
    let hash = digest(&SHA256, text.as_bytes());
    hex::encode(hash.as_ref())
}

/// Whether `s` is exactly `len` hex digits (either case).
pub fn is_hex_digest(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Whether `s` looks like an MD5 digest.
pub fn is_valid_md5(s: &str) -> bool {
    is_hex_digest(s, MD5_HEX_LEN)
}

/// Whether `s` looks like a SHA-256 digest.
pub fn is_valid_sha256(s: &str) -> bool {
    is_hex_digest(s, SHA256_HEX_LEN)
}
