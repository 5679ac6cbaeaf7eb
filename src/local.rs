//! Notes kept as one versioned JSON document in a key-value slot.
//!
//! Every operation reads the whole document, works on it in memory and, for
//! mutations, writes the whole document back with a single `set_item`. There
//! is no cache: two stores over the same slot see each other's writes, and
//! the last writer wins.

use std::collections::HashSet;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    error::{NotesError, NotesResult},
    kv::KeyValueSlot,
    notes::{
        helpers::{
            generate_id, id_from_value, non_empty_string, not_before, now_rfc3339,
            pair_timestamps, string_or_empty, EPOCH_RFC3339,
        },
        Note, NotePatch, StoreDocument, DOCUMENT_VERSION,
    },
    store::NoteStore,
};

pub const STORAGE_KEY: &str = "simple_notes_app__notes_v1";

pub struct LocalStore<K> {
    kv: K,
    key: String,
}

impl<K: KeyValueSlot> LocalStore<K> {
    pub fn new(kv: K) -> Self {
        Self::with_key(kv, STORAGE_KEY)
    }

    pub fn with_key(kv: K, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    pub fn slot(&self) -> &K {
        &self.kv
    }

    fn read_document(&self) -> StoreDocument {
        match self.kv.get_item(&self.key) {
            Ok(Some(raw)) => parse_document(&raw),
            Ok(None) => StoreDocument::default(),
            Err(err) => {
                warn!(key = %self.key, "notes slot unreadable, starting empty: {err}");
                StoreDocument::default()
            }
        }
    }

    fn write_document(&self, doc: &StoreDocument) -> NotesResult<()> {
        let raw = serde_json::to_string(doc)?;
        self.kv.set_item(&self.key, &raw)
    }

    /// Stored order, unsorted.
    pub fn list_notes(&self) -> Vec<Note> {
        let notes = self.read_document().notes;
        debug!(count = notes.len(), "listed local notes");
        notes
    }

    pub fn get_note(&self, id: &str) -> Option<Note> {
        self.read_document().find(id).cloned()
    }

    pub fn create_note(&self, patch: NotePatch) -> NotesResult<Note> {
        let mut doc = self.read_document();

        let mut id = generate_id();
        while doc.find(&id).is_some() {
            id = generate_id();
        }

        let now = now_rfc3339();
        let created = Note {
            id,
            title: patch.title.unwrap_or_default(),
            content: patch.content.unwrap_or_default(),
            created_at: now.clone(),
            updated_at: now,
        };

        doc.notes.push(created.clone());
        self.write_document(&doc)?;

        info!(id = %created.id, "note created");
        Ok(created)
    }

    pub fn update_note(&self, id: &str, patch: NotePatch) -> NotesResult<Note> {
        let mut doc = self.read_document();
        let idx = doc.position(id).ok_or_else(|| NotesError::not_found(id))?;

        let prev = &doc.notes[idx];
        let next = Note {
            id: prev.id.clone(),
            title: patch.title.unwrap_or_else(|| prev.title.clone()),
            content: patch.content.unwrap_or_else(|| prev.content.clone()),
            created_at: prev.created_at.clone(),
            updated_at: not_before(&prev.created_at, now_rfc3339()),
        };

        doc.notes[idx] = next.clone();
        self.write_document(&doc)?;

        info!(id = %next.id, "note updated");
        Ok(next)
    }

    pub fn delete_note(&self, id: &str) -> NotesResult<bool> {
        let mut doc = self.read_document();
        let before = doc.notes.len();
        doc.notes.retain(|n| n.id != id);

        let deleted = doc.notes.len() != before;
        if deleted {
            self.write_document(&doc)?;
            info!(id, "note deleted");
        } else {
            debug!(id, "delete of unknown note ignored");
        }
        Ok(deleted)
    }

    /// Test helper: clears all notes from the slot.
    pub fn reset(&self) -> NotesResult<()> {
        self.write_document(&StoreDocument::default())
    }
}

#[async_trait]
impl<K: KeyValueSlot> NoteStore for LocalStore<K> {
    async fn list(&self) -> NotesResult<Vec<Note>> {
        Ok(self.list_notes())
    }

    async fn get(&self, id: &str) -> NotesResult<Option<Note>> {
        Ok(self.get_note(id))
    }

    async fn create(&self, patch: NotePatch) -> NotesResult<Note> {
        self.create_note(patch)
    }

    async fn update(&self, id: &str, patch: NotePatch) -> NotesResult<Note> {
        self.update_note(id, patch)
    }

    async fn delete(&self, id: &str) -> NotesResult<bool> {
        self.delete_note(id)
    }
}

/// Lenient decode of the slot contents. Anything unusable degrades to the
/// empty document or is dropped entry by entry.
pub(crate) fn parse_document(raw: &str) -> StoreDocument {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            warn!("notes document is not valid JSON, starting empty: {err}");
            return StoreDocument::default();
        }
    };

    let Some(entries) = value.get("notes").and_then(Value::as_array) else {
        warn!("notes document has no notes array, starting empty");
        return StoreDocument::default();
    };

    let mut seen = HashSet::new();
    let mut notes = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(note) = note_from_stored(entry) else {
            warn!("dropping stored note without an id");
            continue;
        };
        if !seen.insert(note.id.clone()) {
            warn!(id = %note.id, "dropping duplicate stored note");
            continue;
        }
        notes.push(note);
    }

    StoreDocument {
        version: DOCUMENT_VERSION,
        notes,
    }
}

fn note_from_stored(entry: &Value) -> Option<Note> {
    let id = id_from_value(entry.get("id"))?;
    let (created_at, updated_at) = pair_timestamps(
        non_empty_string(entry.get("created_at")),
        non_empty_string(entry.get("updated_at")),
        EPOCH_RFC3339,
    );

    Some(Note {
        id,
        title: string_or_empty(entry.get("title")),
        content: string_or_empty(entry.get("content")),
        created_at,
        updated_at,
    })
}
