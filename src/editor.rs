//! Editor state for creating and editing a single note.

use thiserror::Error;

use crate::{
    error::NotesError,
    notes::{Note, NotePatch},
    store::NoteStore,
};

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_CONTENT_CHARS: usize = 20_000;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = [self.title.as_deref(), self.content.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        f.write_str(&messages.join(" "))
    }
}

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("{0}")]
    Invalid(ValidationErrors),

    #[error(transparent)]
    Store(#[from] NotesError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Snapshot {
    title: String,
    content: String,
}

#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    id: Option<String>,
    title: String,
    content: String,
    saved: Snapshot,
}

impl EditorSession {
    pub fn new_note() -> Self {
        Self::default()
    }

    /// Loads `id` for editing. A note that no longer exists is `NotFound`.
    pub async fn open<S: NoteStore + ?Sized>(store: &S, id: &str) -> Result<Self, EditorError> {
        let note = store
            .get(id)
            .await?
            .ok_or_else(|| NotesError::not_found(id))?;
        Ok(Self::from_note(note))
    }

    pub fn from_note(note: Note) -> Self {
        let saved = Snapshot {
            title: note.title.clone(),
            content: note.content.clone(),
        };
        Self {
            id: Some(note.id),
            title: note.title,
            content: note.content,
            saved,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    pub fn is_dirty(&self) -> bool {
        self.title != self.saved.title || self.content != self.saved.content
    }

    pub fn can_save(&self) -> bool {
        self.is_new() || self.is_dirty()
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if self.title.chars().count() > MAX_TITLE_CHARS {
            errors.title = Some(format!(
                "Title is too long (max {MAX_TITLE_CHARS} characters)."
            ));
        }
        if self.content.chars().count() > MAX_CONTENT_CHARS {
            errors.content = Some(format!(
                "Content is too long (max {MAX_CONTENT_CHARS} characters)."
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates the note on first save, updates it afterwards. The title is
    /// saved trimmed.
    pub async fn save<S: NoteStore + ?Sized>(&mut self, store: &S) -> Result<Note, EditorError> {
        self.validate().map_err(EditorError::Invalid)?;

        let patch = NotePatch::new(self.title.trim(), self.content.clone());
        let saved = match self.id.as_deref() {
            None => store.create(patch).await?,
            Some(id) => store.update(id, patch).await?,
        };

        self.id = Some(saved.id.clone());
        self.title = saved.title.clone();
        self.content = saved.content.clone();
        self.saved = Snapshot {
            title: saved.title.clone(),
            content: saved.content.clone(),
        };
        Ok(saved)
    }

    /// `false` for a draft that was never saved.
    pub async fn delete<S: NoteStore + ?Sized>(&self, store: &S) -> Result<bool, EditorError> {
        match self.id.as_deref() {
            None => Ok(false),
            Some(id) => Ok(store.delete(id).await?),
        }
    }
}
