//! Stable content identifiers.

use sha2::{Digest, Sha256};

/// Short stable ID for file content: first 12 hex chars of SHA-256 over the
/// display path and the raw bytes.
pub fn content_id(relative_path: &str, bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(relative_path.as_bytes());
    hasher.update([0u8]);
    hasher.update(bytes);
    let digest = hasher.finalize();
    format!("{digest:x}")[..12].to_string()
}
