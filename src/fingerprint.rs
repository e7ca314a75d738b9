//! Content fingerprinting.

use sha2::{Digest, Sha256};

/// SHA-256 of the UTF-8 bytes of `text`, rendered as lowercase hex.
///
/// Used as a compact equality proxy for "did the visible content change";
/// no security property is relied on.
pub fn content_digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
