use std::{io::Write, path::PathBuf};

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::{
    config::{AppConfig, BackendKind},
    editor::{EditorError, EditorSession},
    error::NotesError,
    list_view,
    store::NoteStore,
};

#[derive(Debug, Parser)]
#[command(name = "simple-notes", version, about = "Take notes locally or against a notes API")]
pub struct Cli {
    /// Storage backend: local or remote
    #[arg(long, global = true)]
    pub backend: Option<BackendKind>,

    /// Directory holding the local notes slot
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Base URL of the notes API
    #[arg(long, global = true)]
    pub api_base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List notes, newest first
    List,
    /// Print one note
    Show { id: String },
    /// Create a note
    New {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Change the title and/or content of a note
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a note
    Delete { id: String },
    /// Show which backend and locations are in use
    Info,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Note not found (it may have been deleted).")]
    Missing,

    #[error(transparent)]
    Editor(EditorError),

    #[error(transparent)]
    Notes(NotesError),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl From<NotesError> for CliError {
    fn from(err: NotesError) -> Self {
        if err.is_not_found() {
            Self::Missing
        } else {
            Self::Notes(err)
        }
    }
}

impl From<EditorError> for CliError {
    fn from(err: EditorError) -> Self {
        match err {
            EditorError::Store(err) => err.into(),
            other => Self::Editor(other),
        }
    }
}

impl Cli {
    /// Flags win over whatever the environment said.
    pub fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(url) = &self.api_base_url {
            config.api_base_url = Some(url.clone());
        }
        config
    }
}

pub async fn execute<S, W>(
    command: &Command,
    config: &AppConfig,
    store: &S,
    out: &mut W,
) -> Result<(), CliError>
where
    S: NoteStore + ?Sized,
    W: Write,
{
    match command {
        Command::List => {
            let cards = list_view::cards(store.list().await?);
            if cards.is_empty() {
                writeln!(out, "No notes yet. Run `simple-notes new` to create your first one.")?;
            }
            for card in cards {
                writeln!(out, "{}\t{}", card.id, card.title)?;
                if !card.snippet.is_empty() {
                    writeln!(out, "\t{}", card.snippet)?;
                }
            }
        }
        Command::Show { id } => {
            let note = store.get(id).await?.ok_or(CliError::Missing)?;
            writeln!(out, "id:      {}", note.id)?;
            writeln!(out, "title:   {}", list_view::display_title(&note.title))?;
            writeln!(out, "created: {}", note.created_at)?;
            writeln!(out, "updated: {}", note.updated_at)?;
            writeln!(out)?;
            writeln!(out, "{}", note.content)?;
        }
        Command::New { title, content } => {
            let mut editor = EditorSession::new_note();
            editor.set_title(title.clone().unwrap_or_default());
            editor.set_content(content.clone().unwrap_or_default());
            let created = editor.save(store).await?;
            writeln!(out, "{}", created.id)?;
        }
        Command::Edit { id, title, content } => {
            let mut editor = EditorSession::open(store, id).await?;
            if let Some(title) = title {
                editor.set_title(title.clone());
            }
            if let Some(content) = content {
                editor.set_content(content.clone());
            }
            if !editor.can_save() {
                writeln!(out, "no changes")?;
                return Ok(());
            }
            let saved = editor.save(store).await?;
            writeln!(out, "saved {}", saved.id)?;
        }
        Command::Delete { id } => {
            let deleted = store.delete(id).await?;
            writeln!(out, "{}", if deleted { "deleted" } else { "not found" })?;
        }
        Command::Info => {
            writeln!(out, "backend:  {}", config.backend)?;
            writeln!(out, "data dir: {}", config.data_dir.display())?;
            writeln!(out, "API base: {}", config.effective_api_base_url())?;
        }
    }
    Ok(())
}
