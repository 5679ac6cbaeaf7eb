use std::{fmt, path::PathBuf, str::FromStr};

use tracing::warn;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001";

pub const ENV_BACKEND: &str = "NOTES_BACKEND";
pub const ENV_DATA_DIR: &str = "NOTES_DATA_DIR";
pub const ENV_API_BASE_URL: &str = "NOTES_API_BASE_URL";
pub const ENV_API_BASE: &str = "NOTES_API_BASE";

const APP_DIR_NAME: &str = "simple-notes";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    Local,
    Remote,
}

impl BackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "remote" | "api" => Ok(Self::Remote),
            other => Err(format!("unknown backend '{other}' (expected local or remote)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub backend: BackendKind,
    pub data_dir: PathBuf,
    /// `None` means "resolve from the environment on every request".
    pub api_base_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let backend = match env_value(ENV_BACKEND) {
            None => BackendKind::default(),
            Some(raw) => raw.parse().unwrap_or_else(|err| {
                warn!("{err}; using local backend");
                BackendKind::Local
            }),
        };

        Self {
            backend,
            data_dir: env_value(ENV_DATA_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(default_data_dir),
            api_base_url: None,
        }
    }

    /// The base URL a remote request would use right now.
    pub fn effective_api_base_url(&self) -> String {
        self.api_base_url
            .clone()
            .unwrap_or_else(api_base_url_from_env)
    }
}

/// Loads `.env` from the working directory if present.
pub fn load_env_files() {
    let _ = dotenvy::from_filename(".env");
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn api_base_url_from_env() -> String {
    resolve_api_base_url(env_value(ENV_API_BASE_URL), env_value(ENV_API_BASE))
}

pub(crate) fn resolve_api_base_url(primary: Option<String>, secondary: Option<String>) -> String {
    let url = primary
        .or(secondary)
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
    if let Err(err) = Url::parse(&url) {
        warn!(url = %url, "notes API base URL does not parse: {err}");
    }
    url
}

pub fn default_data_dir() -> PathBuf {
    resolve_data_dir(
        std::env::var_os("XDG_DATA_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn resolve_data_dir(xdg_data_home: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = xdg_data_home.filter(|p| p.is_absolute()) {
        return dir.join(APP_DIR_NAME);
    }
    if let Some(home) = home.filter(|p| !p.as_os_str().is_empty()) {
        return home.join(".local").join("share").join(APP_DIR_NAME);
    }
    PathBuf::from(format!(".{APP_DIR_NAME}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_kind_parses_case_insensitively() {
        assert_eq!("local".parse::<BackendKind>(), Ok(BackendKind::Local));
        assert_eq!(" Remote ".parse::<BackendKind>(), Ok(BackendKind::Remote));
        assert_eq!("api".parse::<BackendKind>(), Ok(BackendKind::Remote));
        assert!("sqlite".parse::<BackendKind>().is_err());
    }

    #[test]
    fn api_base_url_prefers_primary_then_secondary_then_default() {
        assert_eq!(
            resolve_api_base_url(Some("http://a".into()), Some("http://b".into())),
            "http://a"
        );
        assert_eq!(resolve_api_base_url(None, Some("http://b".into())), "http://b");
        assert_eq!(resolve_api_base_url(None, None), DEFAULT_API_BASE_URL);
    }

    #[test]
    fn data_dir_follows_xdg_then_home() {
        assert_eq!(
            resolve_data_dir(Some("/xdg".into()), Some("/home/u".into())),
            PathBuf::from("/xdg/simple-notes")
        );
        assert_eq!(
            resolve_data_dir(Some("relative".into()), Some("/home/u".into())),
            PathBuf::from("/home/u/.local/share/simple-notes")
        );
        assert_eq!(resolve_data_dir(None, None), PathBuf::from(".simple-notes"));
    }

    #[test]
    fn explicit_base_url_wins() {
        let config = AppConfig {
            backend: BackendKind::Remote,
            data_dir: PathBuf::from("/tmp/x"),
            api_base_url: Some("http://fixed:1".into()),
        };
        assert_eq!(config.effective_api_base_url(), "http://fixed:1");
    }
}
