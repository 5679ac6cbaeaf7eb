use std::path::{Component, Path, PathBuf};

use crate::error::NotesError;

/// Maps a slot key to `<root>/<key>.json`, refusing keys that would escape
/// `root` or hide the file.
pub fn slot_file(root: &Path, key: &str) -> Result<PathBuf, NotesError> {
    if key.is_empty() || key.starts_with('.') {
        return Err(NotesError::InvalidKey(key.to_string()));
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(NotesError::InvalidKey(key.to_string()));
    }

    let rel = PathBuf::from(format!("{key}.json"));
    for c in rel.components() {
        match c {
            Component::Normal(_) => {}
            _ => return Err(NotesError::InvalidKey(key.to_string())),
        }
    }

    Ok(root.join(rel))
}
