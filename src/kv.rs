//! String-keyed, string-valued persistent slots, the same shape as browser
//! `localStorage`. The local store is generic over this so tests can run
//! against memory or a temp dir.

use std::{
    collections::HashMap,
    io,
    path::PathBuf,
    sync::Mutex,
};

use crate::{error::NotesError, io_atomic, paths};

pub trait KeyValueSlot: Send + Sync {
    /// `Ok(None)` when nothing was ever stored under `key`.
    fn get_item(&self, key: &str) -> Result<Option<String>, NotesError>;

    /// Replaces the whole value under `key`. Single-key atomic.
    fn set_item(&self, key: &str, value: &str) -> Result<(), NotesError>;
}

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileKv {
    root: PathBuf,
}

impl FileKv {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl KeyValueSlot for FileKv {
    fn get_item(&self, key: &str) -> Result<Option<String>, NotesError> {
        let path = paths::slot_file(&self.root, key)?;
        Ok(io_atomic::read_if_exists(&path)?)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), NotesError> {
        let path = paths::slot_file(&self.root, key)?;
        io_atomic::write_atomic(&path, value.as_bytes())?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryKv {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> NotesError {
        NotesError::Storage(io::Error::other("memory slot poisoned"))
    }
}

impl KeyValueSlot for MemoryKv {
    fn get_item(&self, key: &str) -> Result<Option<String>, NotesError> {
        let items = self.items.lock().map_err(|_| Self::poisoned())?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), NotesError> {
        let mut items = self.items.lock().map_err(|_| Self::poisoned())?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<K: KeyValueSlot + ?Sized> KeyValueSlot for std::sync::Arc<K> {
    fn get_item(&self, key: &str) -> Result<Option<String>, NotesError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), NotesError> {
        (**self).set_item(key, value)
    }
}
