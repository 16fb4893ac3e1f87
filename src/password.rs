//! Password digestion.
//!
//! Stored passwords are plain SHA-256 hex digests: no salt, no iteration
//! count. The format must stay compatible with the records already held in
//! storage.

use std::sync::LazyLock;

use regex_lite::Regex;
use sha2::{Digest, Sha256};

static HASHED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-fA-F0-9]{64}$").unwrap());

/// Digest a plain password into lowercase hex. Blank input stays the empty
/// string ("no password").
pub fn hash(plain: &str) -> String {
    let normalized = plain.trim();
    if normalized.is_empty() {
        return String::new();
    }

    hex::encode(Sha256::digest(normalized))
}

/// Idempotent normalization: an input that already is a 64-hex digest is
/// returned lowercased, anything else is hashed.
pub fn ensure_hashed(value: &str) -> String {
    let normalized = value.trim();
    if normalized.is_empty() {
        return String::new();
    }

    if HASHED.is_match(normalized) {
        normalized.to_lowercase()
    } else {
        hash(normalized)
    }
}

/// Recompute and compare. An empty stored digest never matches.
pub fn matches(plain: &str, stored: &str) -> bool {
    if stored.is_empty() {
        return false;
    }

    hash(plain) == stored
}
