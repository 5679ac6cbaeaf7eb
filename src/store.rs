use async_trait::async_trait;

use crate::{
    error::NotesResult,
    notes::{Note, NotePatch},
};

/// CRUD contract shared by the local and remote backends.
///
/// Callers pick one implementation at composition time and must not be able
/// to tell them apart:
///
/// - `get` and `delete` treat a missing id as a normal outcome (`None` / `false`);
/// - `update` of a missing id fails with
///   [`NotesError::NotFound`](crate::error::NotesError::NotFound);
/// - every mutation is durable before it returns, so a following `list`/`get`
///   observes it.
#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn list(&self) -> NotesResult<Vec<Note>>;

    async fn get(&self, id: &str) -> NotesResult<Option<Note>>;

    /// Missing fields default to the empty string.
    async fn create(&self, patch: NotePatch) -> NotesResult<Note>;

    /// Only the fields present in `patch` change. `created_at` is kept and
    /// `updated_at` refreshed.
    async fn update(&self, id: &str, patch: NotePatch) -> NotesResult<Note>;

    /// `true` when a note was removed.
    async fn delete(&self, id: &str) -> NotesResult<bool>;
}
