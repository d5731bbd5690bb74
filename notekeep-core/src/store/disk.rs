//! Disk-backed note store
//!
//! The persistent engine: an append-only data log plus an append-only index
//! log, an in-memory index rebuilt from the index log at startup, and a write
//! serializer so at most one mutation touches on-disk state at a time.
//!
//! Mutations append to the data log, append a pointer or tombstone to the
//! index log, and only then update the in-memory index, so readers observe
//! either the fully-old or fully-new mapping and never a torn one. Old data
//! bytes are shadowed, never rewritten; file growth is unbounded by design
//! (no compaction).
//!
//! Precondition: one process owns a storage directory at a time. There is no
//! cross-process lock on the log files.

use super::{clamp_page, page_count, NoteStore, StoreConfig};
use crate::codec;
use crate::log::{replay, DataReader, IndexEntry, LogPair, INDEX_FILENAME};
use crate::types::now_ms;
use crate::{Note, NoteDraft, NotePage, NotePatch, Result, StoreError};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use tokio::sync::{Mutex, OnceCell};
use tracing::info;

/// Persistent note store over an append-only log pair
pub struct DiskStore {
    cfg: StoreConfig,
    state: OnceCell<DiskState>,
}

struct DiskState {
    /// id -> latest index entry; the sole source of liveness truth
    index: RwLock<HashMap<u64, IndexEntry>>,
    /// Write serializer: id assignment, capacity check, both appends and the
    /// index update all happen while holding this lock (tokio's mutex hands
    /// it out in FIFO order, so mutations apply in request order)
    writer: Mutex<Writer>,
    reader: DataReader,
}

struct Writer {
    logs: LogPair,
    next_id: u64,
}

impl DiskStore {
    /// Create a store over the given storage directory
    ///
    /// Nothing is opened until the first operation; initialization runs
    /// exactly once and concurrent first callers all wait on it.
    pub fn new(cfg: StoreConfig) -> Self {
        Self {
            cfg,
            state: OnceCell::new(),
        }
    }

    async fn ensure_ready(&self) -> Result<&DiskState> {
        self.state
            .get_or_try_init(|| async {
                let logs = LogPair::open(&self.cfg.dir).await?;
                let recovered = replay(&self.cfg.dir.join(INDEX_FILENAME)).await?;
                let reader = DataReader::open(&self.cfg.dir).await?;

                info!(
                    entries = recovered.entries.len(),
                    skipped = recovered.skipped,
                    next_id = recovered.next_id,
                    "recovered note index from {:?}",
                    self.cfg.dir
                );

                Ok(DiskState {
                    index: RwLock::new(recovered.entries),
                    writer: Mutex::new(Writer {
                        logs,
                        next_id: recovered.next_id,
                    }),
                    reader,
                })
            })
            .await
    }

    fn live_entry(state: &DiskState, id: u64) -> Option<IndexEntry> {
        state
            .index
            .read()
            .get(&id)
            .filter(|e| !e.is_tombstone())
            .copied()
    }

    fn live_count(state: &DiskState) -> usize {
        state
            .index
            .read()
            .values()
            .filter(|e| !e.is_tombstone())
            .count()
    }

    /// Fetch and decode the note a live entry points at
    ///
    /// A decode failure here means the data log no longer matches the index,
    /// which is corruption, not absence.
    async fn read_note(state: &DiskState, entry: IndexEntry) -> Result<Note> {
        let bytes = state.reader.read_at(entry.offset, entry.length).await?;
        let line = std::str::from_utf8(&bytes).map_err(|e| {
            StoreError::Corruption(format!("note {} data is not utf-8: {}", entry.id, e))
        })?;
        codec::decode(line)
    }

    /// Append a note line plus its index entry, then publish the mapping
    ///
    /// Must be called with the write serializer held. The in-memory index is
    /// only touched after both appends succeed, so a failed append never
    /// leaves it pointing at bytes that were not written.
    async fn append_note(
        writer: &mut Writer,
        index: &RwLock<HashMap<u64, IndexEntry>>,
        note: &Note,
    ) -> Result<()> {
        let line = codec::encode(note)?;
        let (offset, length) = writer.logs.append_data(&line).await?;

        let entry = IndexEntry::live(note.id, offset, length);
        writer.logs.append_index(&entry).await?;

        index.write().insert(note.id, entry);
        Ok(())
    }
}

#[async_trait]
impl NoteStore for DiskStore {
    async fn list(&self, page: i64) -> Result<NotePage> {
        let state = self.ensure_ready().await?;
        let page = clamp_page(page);

        let mut live: Vec<IndexEntry> = {
            let index = state.index.read();
            index
                .values()
                .filter(|e| !e.is_tombstone())
                .copied()
                .collect()
        };
        live.sort_unstable_by(|a, b| b.id.cmp(&a.id));

        let notes_count = live.len();
        let start = page.saturating_sub(1).saturating_mul(crate::config::PER_PAGE);

        let mut notes = Vec::new();
        for entry in live.iter().skip(start).take(crate::config::PER_PAGE) {
            notes.push(Self::read_note(state, *entry).await?);
        }

        Ok(NotePage {
            pages: page_count(notes_count),
            notes_count: notes_count as u64,
            notes,
        })
    }

    async fn get(&self, id: u64) -> Result<Note> {
        let state = self.ensure_ready().await?;
        let entry = Self::live_entry(state, id).ok_or(StoreError::NotFound)?;
        Self::read_note(state, entry).await
    }

    async fn create(&self, draft: NoteDraft) -> Result<Note> {
        let state = self.ensure_ready().await?;
        let mut writer = state.writer.lock().await;

        if Self::live_count(state) >= self.cfg.max_notes {
            return Err(StoreError::CapacityExceeded {
                max: self.cfg.max_notes,
            });
        }

        let now = now_ms();
        let note = Note {
            id: writer.next_id,
            title: draft.title,
            text: draft.text,
            created_at: now,
            updated_at: now,
        };

        Self::append_note(&mut writer, &state.index, &note).await?;
        writer.next_id += 1;
        Ok(note)
    }

    async fn update(&self, id: u64, patch: NotePatch) -> Result<Note> {
        let state = self.ensure_ready().await?;
        let mut writer = state.writer.lock().await;

        let entry = Self::live_entry(state, id).ok_or(StoreError::NotFound)?;
        let current = Self::read_note(state, entry).await?;

        let updated = Note {
            id: current.id,
            title: patch.title.unwrap_or(current.title),
            text: patch.text.unwrap_or(current.text),
            created_at: current.created_at,
            updated_at: now_ms().max(current.updated_at),
        };

        Self::append_note(&mut writer, &state.index, &updated).await?;
        Ok(updated)
    }

    async fn delete(&self, id: u64) -> Result<()> {
        let state = self.ensure_ready().await?;
        let mut writer = state.writer.lock().await;

        if Self::live_entry(state, id).is_none() {
            return Err(StoreError::NotFound);
        }

        let entry = IndexEntry::tombstone(id);
        writer.logs.append_index(&entry).await?;
        state.index.write().insert(id, entry);
        Ok(())
    }

    async fn flush_all(&self) -> Result<()> {
        let state = self.ensure_ready().await?;
        let mut writer = state.writer.lock().await;

        writer.logs.truncate_both().await?;
        state.index.write().clear();
        writer.next_id = 1;
        Ok(())
    }
}
