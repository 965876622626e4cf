//! Content versions for loaded tables.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Identity of one loaded table: a content hash plus when it was read.
///
/// Two versions with the same `hash` describe identical input, whatever
/// their load times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableVersion {
    /// Hex SHA-256 of the source bytes
    pub hash: String,
    /// Number of decoded rows
    pub rows: usize,
    /// When the table was loaded
    pub loaded_at: DateTime<Utc>,
}

impl TableVersion {
    pub fn from_bytes(bytes: &[u8], rows: usize) -> Self {
        Self {
            hash: content_hash(bytes),
            rows,
            loaded_at: Utc::now(),
        }
    }

    /// First 12 hex digits, for display.
    pub fn short_hash(&self) -> &str {
        &self.hash[..self.hash.len().min(12)]
    }
}

/// Hex-encoded SHA-256 of `bytes`.
pub fn content_hash(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
