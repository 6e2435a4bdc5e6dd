//! Text digests using blake3.
//!
//! Arbitrary input (an email address, a user name) becomes a hex string long
//! enough for any grid the generator accepts.
//!
//! # Usage
//!
//! ```ignore
//! use crate::utils::hash;
//!
//! let hex = hash::digest_text("user@example.com"); // 64 hex digits
//! ```

/// Hex digits produced per digest.
pub const DIGEST_HEX_LEN: usize = blake3::OUT_LEN * 2;

/// Hex-encoded blake3 digest of `text`.
pub fn digest_text(text: &str) -> String {
    digest_bytes(text.as_bytes())
}

/// Hex-encoded blake3 digest of raw bytes.
#[inline]
pub fn digest_bytes(data: &[u8]) -> String {
    hex::encode(blake3::hash(data).as_bytes())
}
