//! Page requests and the fetcher seam
//!
//! A collection knows its query only as an opaque URL plus parameters. For
//! each planned window it builds a `PageRequest` and hands it to a `Fetcher`.

use super::window::PageWindow;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Query parameter carrying the window size
pub const LIMIT_PARAM: &str = "page[limit]";

/// Query parameter carrying the window start
pub const OFFSET_PARAM: &str = "page[offset]";

/// Fixed query of one collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Collection URL (absolute, or relative to the client's base URL)
    pub url: String,
    /// Filter, sort and include parameters, already in wire form
    pub params: Vec<(String, String)>,
    /// Extra headers for every page request
    pub headers: HashMap<String, String>,
}

impl ListQuery {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Add a query parameter
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Add several query parameters
    #[must_use]
    pub fn params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Request for one window. Caller-supplied paging parameters are
    /// replaced by the window's.
    pub fn page(&self, window: PageWindow) -> PageRequest {
        let mut params: Vec<(String, String)> = self
            .params
            .iter()
            .filter(|(k, _)| k != LIMIT_PARAM && k != OFFSET_PARAM)
            .cloned()
            .collect();
        params.push((LIMIT_PARAM.to_string(), window.limit.to_string()));
        params.push((OFFSET_PARAM.to_string(), window.offset.to_string()));

        PageRequest {
            url: self.url.clone(),
            params,
            headers: self.headers.clone(),
            window,
        }
    }
}

/// One outgoing page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub url: String,
    pub params: Vec<(String, String)>,
    pub headers: HashMap<String, String>,
    pub window: PageWindow,
}

impl PageRequest {
    /// Value of a query parameter
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Performs page requests
///
/// Implementations must fail on any non-success response and must not retry.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &PageRequest) -> Result<Document>;
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for Arc<F> {
    async fn fetch(&self, request: &PageRequest) -> Result<Document> {
        (**self).fetch(request).await
    }
}

/// Fetcher backed by the crate's HTTP client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Arc<HttpClient>,
}

impl HttpFetcher {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &PageRequest) -> Result<Document> {
        let mut config = RequestConfig::new();
        for (key, value) in &request.params {
            config = config.query(key, value);
        }
        for (key, value) in &request.headers {
            config = config.header(key, value);
        }

        debug!(
            "Fetching {} offset={} limit={}",
            request.url, request.window.offset, request.window.limit
        );

        self.client
            .get_json::<Document>(&request.url, config)
            .await
            .map_err(|e| match e {
                Error::JsonParse(e) => Error::malformed(e.to_string()),
                other => other,
            })
    }
}
