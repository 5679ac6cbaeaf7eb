use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE},
    Method, Response, StatusCode,
};
use serde_json::Value;
use tracing::debug;

use crate::{
    config,
    error::{NotesError, NotesResult},
};

/// Where the API base URL comes from. `FromEnv` is re-read on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseUrl {
    FromEnv,
    Fixed(String),
}

impl BaseUrl {
    pub fn resolve(&self) -> String {
        match self {
            Self::FromEnv => config::api_base_url_from_env(),
            Self::Fixed(url) => url.clone(),
        }
    }
}

/// Joins with exactly one `/` between base and path.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

pub(crate) fn build_headers(has_body: bool, overrides: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if has_body {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    for (name, value) in overrides {
        headers.insert(name.clone(), value.clone());
    }
    headers
}

pub(crate) fn error_message(status: StatusCode, data: Option<&Value>) -> String {
    data.and_then(|d| {
        ["detail", "message"]
            .iter()
            .filter_map(|key| d.get(*key).and_then(Value::as_str))
            .find(|s| !s.trim().is_empty())
    })
    .map(str::to_string)
    .unwrap_or_else(|| {
        format!(
            "Request failed: {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        )
        .trim_end()
        .to_string()
    })
}

/// `None` unless the response declares JSON and the body parses.
async fn parse_json_safely(response: Response) -> Option<Value> {
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.contains("application/json"))
        .unwrap_or(false);
    if !is_json {
        return None;
    }
    let bytes = response.bytes().await.ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: BaseUrl,
    headers: HeaderMap,
}

impl ApiClient {
    pub fn new(base_url: BaseUrl) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: BaseUrl) -> Self {
        Self {
            client,
            base_url,
            headers: HeaderMap::new(),
        }
    }

    /// Headers sent with every request, overriding the JSON defaults.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> NotesResult<Option<Value>> {
        self.request_with_headers(method, path, body, &HeaderMap::new())
            .await
    }

    /// Sends one request. Non-2xx becomes [`NotesError::Http`]; 204 and
    /// non-JSON bodies come back as `None`.
    pub async fn request_with_headers(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        extra: &HeaderMap,
    ) -> NotesResult<Option<Value>> {
        let url = join_url(&self.base_url.resolve(), path);

        let mut overrides = self.headers.clone();
        for (name, value) in extra {
            overrides.insert(name.clone(), value.clone());
        }
        let headers = build_headers(body.is_some(), &overrides);

        debug!(%method, %url, "notes api request");
        let mut builder = self.client.request(method.clone(), &url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(serde_json::to_vec(body)?);
        }
        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let data = parse_json_safely(response).await;
            let message = error_message(status, data.as_ref());
            debug!(%method, %url, status = status.as_u16(), "notes api error: {message}");
            return Err(NotesError::Http {
                status: status.as_u16(),
                message,
                data,
            });
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        Ok(parse_json_safely(response).await)
    }
}
