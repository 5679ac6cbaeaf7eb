use serde_json::{Map, Value};
use tracing::warn;

use crate::notes::{
    helpers::{id_from_value, pair_timestamps, string_or_empty},
    Note,
};

const ID_KEYS: &[&str] = &["id", "note_id", "uuid"];
const CONTENT_KEYS: &[&str] = &["content", "body"];
const UPDATED_KEYS: &[&str] = &["updated_at", "updatedAt", "modified_at"];
const CREATED_KEYS: &[&str] = &["created_at", "createdAt"];

/// First key in `keys` whose value is present and not `null`.
fn coalesce<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|value| !value.is_null())
}

fn timestamp(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    coalesce(obj, keys)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Maps one note-like object onto [`Note`]. `None` when no id survives.
///
/// A missing timestamp is filled from the other one; when both are missing
/// both are left empty. `updated_at` never sorts before `created_at`.
pub fn normalize_note(value: &Value) -> Option<Note> {
    let obj = value.as_object()?;
    let id = id_from_value(coalesce(obj, ID_KEYS))?;

    let (created_at, updated_at) = pair_timestamps(
        timestamp(obj, CREATED_KEYS),
        timestamp(obj, UPDATED_KEYS),
        "",
    );

    Some(Note {
        id,
        title: string_or_empty(obj.get("title")),
        content: string_or_empty(coalesce(obj, CONTENT_KEYS)),
        created_at,
        updated_at,
    })
}

/// Accepts a bare array or `{"items": [...]}`.
pub fn normalize_list(body: Option<&Value>) -> Vec<Note> {
    let items: &[Value] = match body {
        Some(Value::Array(items)) => items,
        Some(Value::Object(obj)) => obj
            .get("items")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]),
        _ => &[],
    };

    let notes: Vec<Note> = items.iter().filter_map(normalize_note).collect();
    if notes.len() != items.len() {
        warn!(
            dropped = items.len() - notes.len(),
            "ignored remote notes without an id"
        );
    }
    notes
}
