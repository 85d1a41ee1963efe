//! Content hashing for cache invalidation.
//!
//! Module text is the source of truth in the mirror engine; any parsed
//! view of it is a cache keyed by the hash of the content it was derived
//! from. After a write, the view is re-derived rather than trusted.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// SHA-256 content hash, stored hex-encoded for JSON compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(String);

impl ContentHash {
    /// Compute the hash of the given text.
    pub fn compute(content: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        ContentHash(hex::encode(hasher.finalize()))
    }

    /// The hex-encoded digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
