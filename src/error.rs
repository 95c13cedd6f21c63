//! Crate-wide error type
//!
//! Every fallible operation returns [`Result`]. Variants are grouped by the
//! layer that raises them: caller arguments, the paging machinery, settings,
//! the transport and the resource model.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Caller Arguments
    // ============================================================================
    #[error("Invalid argument: {message}")]
    Validation { message: String },

    #[error("Index {index} is out of range (collection has {count} items)")]
    IndexOutOfRange { index: usize, count: usize },

    // ============================================================================
    // Paging
    // ============================================================================
    /// The planner was asked for a window around an index that is already
    /// cached. Callers only plan on a cache miss, so this never reaches users.
    #[error("Index {index} is already cached")]
    AlreadyCached { index: usize },

    /// A page came back without `meta.pagination.count` when a total was needed
    #[error("Response is missing pagination metadata: {message}")]
    StaleMetadata { message: String },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    // ============================================================================
    // Settings and Decoding
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Invalid JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Cannot read file: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Transport
    // ============================================================================
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status; `body` holds the server's error details
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("No response within {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("OAuth2 error: {message}")]
    OAuth2 { message: String },

    // ============================================================================
    // Resources
    // ============================================================================
    #[error("Unknown relationship '{name}' on {kind} resource")]
    UnknownRelationship { kind: String, name: String },

    #[error("Resource '{id}' is not a {expected}")]
    WrongKind { id: String, expected: String },

    #[error("{kind} '{id}' is not loaded")]
    NotLoaded { kind: String, id: String },

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn oauth2(message: impl Into<String>) -> Self {
        Self::OAuth2 {
            message: message.into(),
        }
    }

    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    pub fn stale_metadata(message: impl Into<String>) -> Self {
        Self::StaleMetadata {
            message: message.into(),
        }
    }

    /// Whether the service or the network produced this error, as opposed to
    /// the caller or the local state
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::HttpStatus { .. } | Self::Timeout { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Prefix an error with what was being attempted
pub trait ResultExt<T> {
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Like [`ResultExt::context`], building the message only on failure
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.with_context(|| message.into())
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| Error::Other(format!("{}: {}", f(), e.into())))
    }
}
