//! The note model shared by both backends.

pub mod helpers;
pub mod types;

pub use types::{Note, NotePatch, StoreDocument, DOCUMENT_VERSION};
