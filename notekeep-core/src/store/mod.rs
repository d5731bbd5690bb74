//! Note stores
//!
//! Two backends share one contract: [`DiskStore`], the append-only persistent
//! engine, and [`MemoryStore`], its in-memory sibling.

mod disk;
mod memory;

pub use disk::DiskStore;
pub use memory::MemoryStore;

use crate::{Note, NoteDraft, NotePage, NotePatch, Result};
use async_trait::async_trait;
use std::path::PathBuf;

/// Store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Storage directory, created if missing
    pub dir: PathBuf,
    /// Maximum number of live notes
    pub max_notes: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("storage"),
            max_notes: crate::config::DEFAULT_MAX_NOTES,
        }
    }
}

/// The five store operations plus flush
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// List one page of live notes, newest id first
    ///
    /// Page numbers at or below zero are treated as page 1; a page past the
    /// end yields an empty `notes` array with correct totals. Never fails on
    /// out-of-range page numbers.
    async fn list(&self, page: i64) -> Result<NotePage>;

    /// Fetch a live note by id
    async fn get(&self, id: u64) -> Result<Note>;

    /// Create a note, assigning the next id and stamping both timestamps
    async fn create(&self, draft: NoteDraft) -> Result<Note>;

    /// Merge the provided fields over an existing note
    async fn update(&self, id: u64, patch: NotePatch) -> Result<Note>;

    /// Delete a live note by id
    async fn delete(&self, id: u64) -> Result<()>;

    /// Drop every note and reset id assignment to 1
    async fn flush_all(&self) -> Result<()>;
}

/// Clamp a requested page number to 1-based
pub(crate) fn clamp_page(page: i64) -> usize {
    if page > 0 {
        page as usize
    } else {
        1
    }
}

/// Total pages for a live note count at the fixed page size
pub(crate) fn page_count(notes_count: usize) -> u64 {
    notes_count.div_ceil(crate::config::PER_PAGE) as u64
}
