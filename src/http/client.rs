//! HTTP transport
//!
//! A reqwest client preconfigured for a JSON:API service. Paths are joined
//! onto the base URL, defaults and per-request headers are merged, the
//! credential is attached, and every non-success status becomes
//! [`Error::HttpStatus`] with the server's error objects summarized.
//!
//! There is no retry loop: a failed request surfaces to the caller as-is.

use crate::auth::{AuthConfig, Authenticator};
use crate::error::{Error, Result};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Media type of JSON:API documents
pub const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";

/// Transport settings shared by every request of one client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Prefix for relative paths
    pub base_url: Option<String>,
    pub timeout: Duration,
    /// Sent with every request unless a request overrides the same name
    pub default_headers: HashMap<String, String>,
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            default_headers: HashMap::from([(
                "Accept".to_string(),
                JSON_API_MEDIA_TYPE.to_string(),
            )]),
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Settings for a service rooted at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }
}

/// Per-request additions
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters, sent in insertion order
    pub query: Vec<(String, String)>,
    pub headers: HashMap<String, String>,
    /// JSON body
    pub body: Option<Value>,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// HTTP client used by fetchers, resource loads and the token exchange
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    authenticator: Authenticator,
}

impl HttpClient {
    /// Unauthenticated client
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        Self::with_auth(config, AuthConfig::None)
    }

    /// Client that attaches `auth` to every request
    pub fn with_auth(config: HttpClientConfig, auth: AuthConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            config,
            authenticator: Authenticator::new(auth),
        })
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    /// Send one request; any non-success status is an error
    pub async fn send(&self, method: Method, path: &str, request: RequestConfig) -> Result<Response> {
        let url = self.resolve(path);
        let mut builder = self.client.request(method.clone(), &url);

        for (name, value) in self.merged_headers(&request.headers) {
            builder = builder.header(name, value);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }
        builder = self.authenticator.apply(builder);

        let response = builder
            .send()
            .await
            .map_err(|e| self.transport_error(&method, &url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("{method} {url} returned {}", status.as_u16());
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: summarize_errors(&body),
            });
        }

        debug!("{method} {url} returned {}", status.as_u16());
        Ok(response)
    }

    /// GET and decode a JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, request: RequestConfig) -> Result<T> {
        self.send_json(Method::GET, path, request).await
    }

    /// POST and decode a JSON body
    pub async fn post_json<T: DeserializeOwned>(&self, path: &str, request: RequestConfig) -> Result<T> {
        self.send_json(Method::POST, path, request).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        request: RequestConfig,
    ) -> Result<T> {
        let response = self.send(method.clone(), path, request).await?;
        let url = response.url().to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(&method, &url, e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Timeouts, whether waiting for headers or reading the body, become
    /// [`Error::Timeout`]
    fn transport_error(&self, method: &Method, url: &str, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            warn!("{method} {url} timed out after {:?}", self.config.timeout);
            Error::Timeout {
                timeout_ms: self.config.timeout.as_millis() as u64,
            }
        } else {
            Error::Http(e)
        }
    }

    /// Absolute URL for `path`; absolute inputs pass through
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        match self.config.base_url {
            Some(ref base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
            None => path.to_string(),
        }
    }

    /// Default headers overlaid with request headers, names compared
    /// case-insensitively
    fn merged_headers<'a>(
        &'a self,
        overrides: &'a HashMap<String, String>,
    ) -> HashMap<String, &'a str> {
        self.config
            .default_headers
            .iter()
            .chain(overrides)
            .map(|(name, value)| (name.to_ascii_lowercase(), value.as_str()))
            .collect()
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("authenticated", &self.authenticator.is_active())
            .finish_non_exhaustive()
    }
}

/// JSON:API error document
#[derive(Deserialize)]
struct ErrorDocument {
    errors: Vec<ErrorObject>,
}

#[derive(Deserialize)]
struct ErrorObject {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

/// Readable form of an error body: the `detail` (or `title`) of each JSON:API
/// error object, or the raw body when it is not an error document
pub(crate) fn summarize_errors(body: &str) -> String {
    let Ok(document) = serde_json::from_str::<ErrorDocument>(body) else {
        return body.to_string();
    };

    let messages: Vec<String> = document
        .errors
        .into_iter()
        .filter_map(|error| error.detail.or(error.title))
        .collect();
    if messages.is_empty() {
        body.to_string()
    } else {
        messages.join("; ")
    }
}
