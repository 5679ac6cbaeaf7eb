//! The notes contract over a REST API.
//!
//! Requests are plain async calls: nothing is queued, retried, deduplicated
//! or cancelled here. Callers that care about ordering must await one call
//! before issuing the next.

pub mod normalize;
pub mod request;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};

use crate::{
    error::{NotesError, NotesResult},
    notes::{Note, NotePatch},
    store::NoteStore,
};

pub use normalize::{normalize_list, normalize_note};
pub use request::{join_url, ApiClient, BaseUrl};

const NOTES_PATH: &str = "/notes";

fn note_path(id: &str) -> String {
    format!("{NOTES_PATH}/{}", urlencoding::encode(id))
}

fn require_note(body: Option<Value>, op: &str) -> NotesResult<Note> {
    body.as_ref()
        .and_then(normalize_note)
        .ok_or_else(|| NotesError::MalformedResponse(format!("{op} returned no note")))
}

#[derive(Debug, Clone)]
pub struct RemoteStore {
    api: ApiClient,
}

impl RemoteStore {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Re-reads the base URL from the environment on every call.
    pub fn from_env() -> Self {
        Self::new(ApiClient::new(BaseUrl::FromEnv))
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::new(ApiClient::new(BaseUrl::Fixed(base_url.into())))
    }
}

#[async_trait]
impl NoteStore for RemoteStore {
    async fn list(&self) -> NotesResult<Vec<Note>> {
        let body = self.api.request(Method::GET, NOTES_PATH, None).await?;
        Ok(normalize_list(body.as_ref()))
    }

    async fn get(&self, id: &str) -> NotesResult<Option<Note>> {
        match self.api.request(Method::GET, &note_path(id), None).await {
            Ok(body) => Ok(body.as_ref().and_then(normalize_note)),
            Err(err) if err.status() == Some(404) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn create(&self, patch: NotePatch) -> NotesResult<Note> {
        let payload = json!({
            "title": patch.title.unwrap_or_default(),
            "content": patch.content.unwrap_or_default(),
        });
        let body = self
            .api
            .request(Method::POST, NOTES_PATH, Some(&payload))
            .await?;
        let created = require_note(body, "create")?;
        tracing::info!(id = %created.id, "remote note created");
        Ok(created)
    }

    async fn update(&self, id: &str, patch: NotePatch) -> NotesResult<Note> {
        let payload = serde_json::to_value(&patch)?;
        let body = match self
            .api
            .request(Method::PUT, &note_path(id), Some(&payload))
            .await
        {
            Ok(body) => body,
            Err(err) if err.status() == Some(404) => return Err(NotesError::not_found(id)),
            Err(err) => return Err(err),
        };
        let updated = require_note(body, "update")?;
        tracing::info!(id = %updated.id, "remote note updated");
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> NotesResult<bool> {
        match self.api.request(Method::DELETE, &note_path(id), None).await {
            Ok(_) => {
                tracing::info!(id, "remote note deleted");
                Ok(true)
            }
            Err(err) if err.status() == Some(404) => Ok(false),
            Err(err) => Err(err),
        }
    }
}
