//! Content digests for loaded snapshots.

use sha2::{Digest, Sha256};

/// Hex SHA-256 of `bytes`, shortened to `len` characters.
pub fn content_digest(bytes: &[u8], len: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let full = format!("{:x}", hasher.finalize());
    full[..len.min(full.len())].to_string()
}
