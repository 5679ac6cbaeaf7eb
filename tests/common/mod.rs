//! In-process stand-in for the notes REST API.
//!
//! Each endpoint answers with a different field-naming style so the remote
//! store's normalization gets exercised end to end.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use simple_notes_lib::{Note, NotePatch};

#[derive(Default)]
struct FakeApi {
    notes: Vec<Note>,
    seq: u32,
}

impl FakeApi {
    fn tick(&mut self) -> (u32, String) {
        self.seq += 1;
        let seq = self.seq;
        (
            seq,
            format!("2024-01-01T{:02}:{:02}:00Z", seq / 60, seq % 60),
        )
    }
}

type Shared = Arc<Mutex<FakeApi>>;

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"detail": "Note not found"})),
    )
        .into_response()
}

async fn list_notes(State(api): State<Shared>) -> Json<Value> {
    let api = api.lock().unwrap();
    let items: Vec<Value> = api
        .notes
        .iter()
        .map(|n| {
            json!({
                "note_id": n.id,
                "title": n.title,
                "body": n.content,
                "createdAt": n.created_at,
                "modified_at": n.updated_at,
            })
        })
        .chain(std::iter::once(json!({"title": "row without an id"})))
        .collect();
    Json(json!({ "items": items }))
}

async fn create_note(State(api): State<Shared>, Json(patch): Json<NotePatch>) -> Response {
    let mut api = api.lock().unwrap();
    let (seq, now) = api.tick();
    let note = Note {
        id: format!("n{seq}"),
        title: patch.title.unwrap_or_default(),
        content: patch.content.unwrap_or_default(),
        created_at: now.clone(),
        updated_at: now,
    };
    api.notes.push(note.clone());
    (
        StatusCode::CREATED,
        Json(json!({
            "uuid": note.id,
            "title": note.title,
            "body": note.content,
            "createdAt": note.created_at,
            "updatedAt": note.updated_at,
        })),
    )
        .into_response()
}

async fn get_note(State(api): State<Shared>, Path(id): Path<String>) -> Response {
    let api = api.lock().unwrap();
    match api.notes.iter().find(|n| n.id == id) {
        Some(note) => Json(note.clone()).into_response(),
        None => not_found(),
    }
}

async fn update_note(
    State(api): State<Shared>,
    Path(id): Path<String>,
    Json(patch): Json<NotePatch>,
) -> Response {
    let mut api = api.lock().unwrap();
    let (_, now) = api.tick();
    let Some(note) = api.notes.iter_mut().find(|n| n.id == id) else {
        return not_found();
    };
    if let Some(title) = patch.title {
        note.title = title;
    }
    if let Some(content) = patch.content {
        note.content = content;
    }
    note.updated_at = now;
    Json(note.clone()).into_response()
}

async fn delete_note(State(api): State<Shared>, Path(id): Path<String>) -> Response {
    let mut api = api.lock().unwrap();
    let before = api.notes.len();
    api.notes.retain(|n| n.id != id);
    if api.notes.len() == before {
        not_found()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}

async fn echo_headers(headers: HeaderMap) -> Json<Value> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    Json(json!({
        "id": "echo",
        "title": header("accept"),
        "content": header("content-type"),
        "x_client": header("x-client"),
    }))
}

/// Starts the fake API on an ephemeral port and returns its base URL (with a
/// trailing slash, to exercise URL joining).
pub async fn spawn_api() -> String {
    let state: Shared = Arc::new(Mutex::new(FakeApi::default()));
    let app = Router::new()
        .route("/notes", get(list_notes).post(create_note))
        .route(
            "/notes/:id",
            get(get_note).put(update_note).delete(delete_note),
        )
        .route("/echo", get(echo_headers).post(echo_headers))
        .route(
            "/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route(
            "/teapot",
            get(|| async {
                (
                    StatusCode::IM_A_TEAPOT,
                    Json(json!({"message": "short and stout"})),
                )
            }),
        )
        .route(
            "/plain",
            get(|| async { "not json" }),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}
