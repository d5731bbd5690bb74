//! Index log entries

use crate::{Result, StoreError};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// One line of the index log
///
/// A non-tombstone entry's `(offset, length)` bounds exactly one encoded note
/// line in the data log. A tombstone marks the id as deleted; its offset and
/// length carry no meaning. Later entries for the same id shadow earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: u64,
    pub offset: u64,
    pub length: u64,
    #[serde(default)]
    pub deleted: bool,
    /// Unix milliseconds at which the entry was appended
    pub ts: i64,
}

impl IndexEntry {
    /// Entry pointing at a live note line
    pub fn live(id: u64, offset: u64, length: u64) -> Self {
        Self {
            id,
            offset,
            length,
            deleted: false,
            ts: Utc::now().timestamp_millis(),
        }
    }

    /// Tombstone entry shadowing all prior entries for `id`
    pub fn tombstone(id: u64) -> Self {
        Self {
            id,
            offset: 0,
            length: 0,
            deleted: true,
            ts: Utc::now().timestamp_millis(),
        }
    }

    pub fn is_tombstone(&self) -> bool {
        self.deleted
    }

    /// Encode as one newline-terminated JSON line
    pub fn encode(&self) -> Result<String> {
        let mut line = serde_json::to_string(self)
            .map_err(|e| StoreError::Corruption(format!("encode index entry {}: {}", self.id, e)))?;
        line.push('\n');
        Ok(line)
    }

    /// Decode one index log line
    pub fn decode(line: &str) -> Result<Self> {
        serde_json::from_str(line.trim_end())
            .map_err(|e| StoreError::Corruption(format!("decode index line: {}", e)))
    }
}
