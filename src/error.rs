use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotesError {
    #[error("Note not found.")]
    NotFound { id: String },

    /// Non-2xx response from the notes API.
    #[error("{message}")]
    Http {
        status: u16,
        message: String,
        data: Option<Value>,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response from notes API: {0}")]
    MalformedResponse(String),

    #[error("storage write failed: {0}")]
    Storage(#[from] std::io::Error),

    #[error("failed to encode notes document: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

impl NotesError {
    pub fn not_found(id: &str) -> Self {
        Self::NotFound { id: id.to_string() }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. }) || self.status() == Some(404)
    }
}

pub type NotesResult<T> = Result<T, NotesError>;

#[cfg(test)]
mod tests {
    use super::NotesError;

    #[test]
    fn http_404_counts_as_not_found() {
        let err = NotesError::Http {
            status: 404,
            message: "gone".to_string(),
            data: None,
        };
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "gone");
    }

    #[test]
    fn local_not_found_has_no_status() {
        let err = NotesError::not_found("abc");
        assert!(err.is_not_found());
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "Note not found.");
    }
}
