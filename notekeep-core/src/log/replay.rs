//! Index log replay for crash recovery

use super::IndexEntry;
use crate::Result;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

/// Outcome of replaying the index log
pub struct RecoveredIndex {
    /// Latest entry per id, tombstones included
    pub entries: HashMap<u64, IndexEntry>,
    /// Next id to assign: max id seen (tombstones included) plus one
    pub next_id: u64,
    /// Lines that could not be parsed and were skipped
    pub skipped: usize,
}

/// Rebuild the in-memory index by replaying the index log in order
///
/// Later entries shadow earlier ones for the same id. Lines that fail to
/// parse are logged and skipped rather than aborting recovery, so a partial
/// trailing write from a crash does not take the store down. A missing index
/// log means a fresh store.
pub async fn replay(index_path: &Path) -> Result<RecoveredIndex> {
    let mut entries = HashMap::new();
    let mut max_id = 0u64;
    let mut skipped = 0usize;

    let file = match File::open(index_path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(RecoveredIndex {
                entries,
                next_id: 1,
                skipped,
            });
        }
        Err(e) => return Err(e.into()),
    };

    let mut lines = BufReader::new(file).lines();
    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match IndexEntry::decode(trimmed) {
            Ok(entry) => {
                max_id = max_id.max(entry.id);
                entries.insert(entry.id, entry);
            }
            Err(e) => {
                warn!("skipping invalid index line: {}", e);
                skipped += 1;
            }
        }
    }

    Ok(RecoveredIndex {
        entries,
        next_id: max_id + 1,
        skipped,
    })
}
