mod io_atomic;
mod paths;

pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod kv;
pub mod list_view;
pub mod local;
pub mod notes;
pub mod remote;
pub mod store;

use std::process::ExitCode;

use clap::Parser;

pub use config::{AppConfig, BackendKind};
pub use error::{NotesError, NotesResult};
pub use kv::{FileKv, KeyValueSlot, MemoryKv};
pub use local::LocalStore;
pub use notes::{Note, NotePatch};
pub use remote::RemoteStore;
pub use store::NoteStore;

pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,simple_notes_lib=info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Builds the backend `config` asks for.
pub fn open_store(config: &AppConfig) -> Box<dyn NoteStore> {
    match config.backend {
        BackendKind::Local => {
            tracing::debug!(dir = %config.data_dir.display(), "using local notes store");
            Box::new(LocalStore::new(FileKv::new(&config.data_dir)))
        }
        BackendKind::Remote => {
            tracing::debug!(base = %config.effective_api_base_url(), "using remote notes store");
            match &config.api_base_url {
                Some(url) => Box::new(RemoteStore::with_base_url(url.clone())),
                None => Box::new(RemoteStore::from_env()),
            }
        }
    }
}

pub fn run() -> ExitCode {
    config::load_env_files();
    init_tracing();

    let cli = cli::Cli::parse();
    let config = cli.apply(AppConfig::from_env());

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("error: failed to start runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(async {
        let store = open_store(&config);
        let mut stdout = std::io::stdout().lock();
        cli::execute(&cli.command, &config, store.as_ref(), &mut stdout).await
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_config_opens_a_file_backed_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            backend: BackendKind::Local,
            data_dir: dir.path().to_path_buf(),
            api_base_url: None,
        };

        let store = open_store(&config);
        let created = store.create(NotePatch::title("persisted")).await.unwrap();

        let reopened = open_store(&config);
        assert_eq!(reopened.get(&created.id).await.unwrap(), Some(created));
        assert!(dir
            .path()
            .join(format!("{}.json", local::STORAGE_KEY))
            .exists());
    }
}
