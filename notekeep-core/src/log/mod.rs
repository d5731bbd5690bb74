//! Append-only log pair
//!
//! Persistence is two independently growing line-oriented files: a data log
//! holding encoded notes and an index log holding location pointers and
//! tombstones in operation order. Data bytes are immutable once written;
//! replaying the index log reconstructs the in-memory index after a restart.

mod entry;
mod pair;
mod replay;

pub use entry::IndexEntry;
pub use pair::{DataReader, LogPair};
pub use replay::{replay, RecoveredIndex};

/// Data log file name within the storage directory
pub const DATA_FILENAME: &str = "notes.data.jsonl";

/// Index log file name within the storage directory
pub const INDEX_FILENAME: &str = "notes.index.jsonl";
