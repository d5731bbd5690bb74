//! In-memory note store
//!
//! The simpler sibling of [`super::DiskStore`]: same contract, no
//! persistence. A single mutex over the map keeps every operation atomic.

use super::{clamp_page, page_count, NoteStore};
use crate::types::now_ms;
use crate::{Note, NoteDraft, NotePage, NotePatch, Result, StoreError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;

/// Volatile note store
pub struct MemoryStore {
    max_notes: usize,
    inner: Mutex<Inner>,
}

struct Inner {
    notes: BTreeMap<u64, Note>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new(max_notes: usize) -> Self {
        Self {
            max_notes,
            inner: Mutex::new(Inner {
                notes: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn list(&self, page: i64) -> Result<NotePage> {
        let page = clamp_page(page);
        let inner = self.inner.lock();

        let notes_count = inner.notes.len();
        let start = page.saturating_sub(1).saturating_mul(crate::config::PER_PAGE);
        let notes: Vec<Note> = inner
            .notes
            .values()
            .rev()
            .skip(start)
            .take(crate::config::PER_PAGE)
            .cloned()
            .collect();

        Ok(NotePage {
            pages: page_count(notes_count),
            notes_count: notes_count as u64,
            notes,
        })
    }

    async fn get(&self, id: u64) -> Result<Note> {
        self.inner
            .lock()
            .notes
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, draft: NoteDraft) -> Result<Note> {
        let mut inner = self.inner.lock();
        if inner.notes.len() >= self.max_notes {
            return Err(StoreError::CapacityExceeded {
                max: self.max_notes,
            });
        }

        let now = now_ms();
        let note = Note {
            id: inner.next_id,
            title: draft.title,
            text: draft.text,
            created_at: now,
            updated_at: now,
        };
        inner.next_id += 1;
        inner.notes.insert(note.id, note.clone());
        Ok(note)
    }

    async fn update(&self, id: u64, patch: NotePatch) -> Result<Note> {
        let mut inner = self.inner.lock();
        let current = inner.notes.get(&id).ok_or(StoreError::NotFound)?;

        let updated = Note {
            id: current.id,
            title: patch.title.unwrap_or_else(|| current.title.clone()),
            text: patch.text.unwrap_or_else(|| current.text.clone()),
            created_at: current.created_at,
            updated_at: now_ms().max(current.updated_at),
        };
        inner.notes.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: u64) -> Result<()> {
        match self.inner.lock().notes.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound),
        }
    }

    async fn flush_all(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.notes.clear();
        inner.next_id = 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, text: &str) -> NoteDraft {
        NoteDraft {
            title: title.to_string(),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let store = MemoryStore::new(10);
        let created = store.create(draft("A", "x")).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.created_at, created.updated_at);

        let fetched = store.get(1).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_ids_are_monotonic() {
        let store = MemoryStore::new(10);
        for expected in 1..=5 {
            let note = store.create(draft("t", "x")).await.unwrap();
            assert_eq!(note.id, expected);
        }
    }

    #[tokio::test]
    async fn test_update_merges_only_given_fields() {
        let store = MemoryStore::new(10);
        let created = store.create(draft("A", "x")).await.unwrap();

        let updated = store
            .update(
                created.id,
                NotePatch {
                    title: Some("B".to_string()),
                    text: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "B");
        assert_eq!(updated.text, "x");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);

        let fetched = store.get(created.id).await.unwrap();
        assert_eq!(fetched.title, "B");
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let store = MemoryStore::new(10);
        let created = store.create(draft("A", "x")).await.unwrap();

        store.delete(created.id).await.unwrap();
        assert!(matches!(
            store.get(created.id).await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store.delete(created.id).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_capacity_frees_up_after_delete() {
        let store = MemoryStore::new(2);
        store.create(draft("1", "x")).await.unwrap();
        store.create(draft("2", "x")).await.unwrap();

        assert!(matches!(
            store.create(draft("3", "x")).await,
            Err(StoreError::CapacityExceeded { max: 2 })
        ));

        store.delete(1).await.unwrap();
        let fourth = store.create(draft("4", "x")).await.unwrap();
        assert_eq!(fourth.id, 3);
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_paged() {
        let store = MemoryStore::new(200);
        for _ in 0..75 {
            store.create(draft("t", "x")).await.unwrap();
        }

        let first = store.list(1).await.unwrap();
        assert_eq!(first.pages, 2);
        assert_eq!(first.notes_count, 75);
        assert_eq!(first.notes.len(), 50);
        assert_eq!(first.notes[0].id, 75);
        assert_eq!(first.notes[49].id, 26);

        let second = store.list(2).await.unwrap();
        assert_eq!(second.notes.len(), 25);
        assert_eq!(second.notes[0].id, 25);
        assert_eq!(second.notes[24].id, 1);

        let past_end = store.list(3).await.unwrap();
        assert!(past_end.notes.is_empty());
        assert_eq!(past_end.pages, 2);
    }

    #[tokio::test]
    async fn test_list_clamps_bad_page_numbers() {
        let store = MemoryStore::new(10);
        store.create(draft("t", "x")).await.unwrap();

        let zero = store.list(0).await.unwrap();
        let negative = store.list(-3).await.unwrap();
        assert_eq!(zero.notes.len(), 1);
        assert_eq!(negative.notes.len(), 1);
    }

    #[tokio::test]
    async fn test_list_huge_page_is_empty_not_a_panic() {
        let store = MemoryStore::new(10);
        store.create(draft("t", "x")).await.unwrap();

        let listed = store.list(i64::MAX).await.unwrap();
        assert!(listed.notes.is_empty());
        assert_eq!(listed.pages, 1);
        assert_eq!(listed.notes_count, 1);
    }

    #[tokio::test]
    async fn test_flush_all_resets_ids() {
        let store = MemoryStore::new(10);
        store.create(draft("t", "x")).await.unwrap();
        store.create(draft("t", "x")).await.unwrap();

        store.flush_all().await.unwrap();

        let listed = store.list(1).await.unwrap();
        assert_eq!(listed.pages, 0);
        assert_eq!(listed.notes_count, 0);
        assert!(listed.notes.is_empty());

        let note = store.create(draft("t", "x")).await.unwrap();
        assert_eq!(note.id, 1);
    }
}
