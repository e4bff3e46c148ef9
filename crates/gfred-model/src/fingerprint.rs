//! Content fingerprints for cache keys and expression ids.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::Result;

/// Length of the hex prefix used by [`short_hash`].
const SHORT_HASH_LEN: usize = 16;

/// SHA-256 digest of `bytes` as lowercase hex.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Fingerprint of an entity's content.
///
/// Two entities with equal serialized content share a fingerprint, so any
/// edit to an entity yields a new cache key.
pub fn fingerprint<T: Serialize>(value: &T) -> Result<String> {
    let bytes = serde_json::to_vec(value)?;
    Ok(sha256_hex(&bytes))
}

/// Short stable id for free text such as a scripted expression.
pub fn short_hash(text: &str) -> String {
    let mut digest = sha256_hex(text.as_bytes());
    digest.truncate(SHORT_HASH_LEN);
    digest
}
