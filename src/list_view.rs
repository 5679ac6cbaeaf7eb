use std::cmp::Reverse;

use time::OffsetDateTime;

use crate::notes::{helpers::parse_timestamp, Note};

pub const DEFAULT_SNIPPET_LEN: usize = 120;
pub const UNTITLED: &str = "Untitled";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteCard {
    pub id: String,
    pub title: String,
    pub snippet: String,
}

fn sort_key(note: &Note) -> OffsetDateTime {
    [note.updated_at.as_str(), note.created_at.as_str()]
        .into_iter()
        .find(|ts| !ts.trim().is_empty())
        .and_then(parse_timestamp)
        .unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

/// Newest first by `updated_at`, falling back to `created_at`. Stable, so
/// notes without usable timestamps keep the order the backend gave them.
pub fn sort_newest_first(notes: &mut [Note]) {
    notes.sort_by_cached_key(|n| Reverse(sort_key(n)));
}

pub fn display_title(title: &str) -> &str {
    if title.is_empty() {
        UNTITLED
    } else {
        title
    }
}

/// Collapses whitespace and cuts to `max_len` chars with a trailing `…`.
pub fn snippet(text: &str, max_len: usize) -> String {
    let clean = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if clean.chars().count() <= max_len {
        return clean;
    }
    let mut out: String = clean.chars().take(max_len).collect();
    out.push('…');
    out
}

pub fn cards(mut notes: Vec<Note>) -> Vec<NoteCard> {
    sort_newest_first(&mut notes);
    notes
        .into_iter()
        .map(|n| NoteCard {
            title: display_title(&n.title).to_string(),
            snippet: snippet(&n.content, DEFAULT_SNIPPET_LEN),
            id: n.id,
        })
        .collect()
}
