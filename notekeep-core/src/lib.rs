//! Notekeep Core - Append-Only Note Storage Engine
//!
//! A small record store that persists variable-length notes to append-only
//! files and serves create/read/update/delete/list with pagination.
//!
//! # Architecture
//!
//! - **Record codec**: one note per self-contained JSON line
//! - **Append log pair**: a data log of note lines and an index log of
//!   location pointers and tombstones, both growing independently
//! - **In-memory index**: id to latest entry, rebuilt by replaying the index
//!   log on startup
//! - **Write serializer**: a FIFO mutex so at most one mutation touches
//!   on-disk state at a time; reads never wait on it
//!
//! Known limitation: updates and deletes shadow old bytes instead of removing
//! them, so log files grow without bound. There is no compaction.

pub mod codec;
pub mod log;
pub mod store;

mod error;
mod types;

pub use error::{Result, StoreError};
pub use store::{DiskStore, MemoryStore, NoteStore, StoreConfig};
pub use types::*;

/// Notekeep version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration values
pub mod config {
    /// Notes returned per listing page
    pub const PER_PAGE: usize = 50;

    /// Default ceiling on live notes
    pub const DEFAULT_MAX_NOTES: usize = 1000;

    /// Maximum title length in characters
    pub const TITLE_MAX_LEN: usize = 120;
}
