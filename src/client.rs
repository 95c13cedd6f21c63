//! Service client
//!
//! `ApiClient` ties the HTTP client, rate gate and page size together and
//! hands out collections and resources. Every request it makes, directly or
//! through a collection, passes through the same gate.

use crate::auth::{OAuthClient, OAuthConfig};
use crate::config::ClientConfig;
use crate::document::{Document, SideTable};
use crate::error::{Error, Result};
use crate::http::{HttpClient, RateGate, RequestConfig, DEFAULT_MIN_INTERVAL};
use crate::pagination::{HttpFetcher, ListQuery, PaginatedCollection};
use crate::query::SearchQuery;
use crate::resource::{Hydrator, Resource, ResourceHydrator, ResourceLoader};
use crate::types::ResourceKind;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Entry point for talking to the service
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Arc<HttpClient>,
    gate: RateGate,
    page_size: usize,
}

impl ApiClient {
    /// Build a client from configuration.
    ///
    /// The process-wide gate is used unless the configuration asks for a
    /// different spacing.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = HttpClient::with_auth(config.http_config(), config.auth_config())?;
        let gate = if config.min_interval() == DEFAULT_MIN_INTERVAL {
            RateGate::global()
        } else {
            RateGate::new(&config.gate_config())
        };
        Ok(Self::from_parts(Arc::new(http), gate, config.page_size))
    }

    /// Assemble a client from ready-made parts
    pub fn from_parts(http: Arc<HttpClient>, gate: RateGate, page_size: usize) -> Self {
        Self {
            http,
            gate,
            page_size,
        }
    }

    pub fn http(&self) -> &Arc<HttpClient> {
        &self.http
    }

    pub fn gate(&self) -> &RateGate {
        &self.gate
    }

    /// Fetch one resource by id
    pub async fn get(&self, kind: ResourceKind, id: &str) -> Result<Resource> {
        let mut resource = Resource::unloaded(kind, id);
        resource.ensure_loaded(self).await?;
        Ok(resource)
    }

    /// Fetch a random resource matching `query`'s filters
    pub async fn random(&self, kind: ResourceKind, query: SearchQuery) -> Result<Resource> {
        let path = format!("{}/random", kind.collection_path());
        let document = self.send(&path, query.into_params()).await?;
        let (raw, included) = document.into_single()?;
        ResourceHydrator.hydrate(raw, &SideTable::new(included))
    }

    /// Lazily paginated search over a resource collection
    pub fn search(
        &self,
        kind: &ResourceKind,
        query: SearchQuery,
    ) -> Result<PaginatedCollection<HttpFetcher, ResourceHydrator>> {
        self.collection(&kind.collection_path(), query.into_params(), ResourceHydrator)
    }

    /// Lazily paginated view of any collection path with a custom hydrator
    pub fn collection<H: Hydrator>(
        &self,
        path: &str,
        params: Vec<(String, String)>,
        hydrator: H,
    ) -> Result<PaginatedCollection<HttpFetcher, H>> {
        let query = ListQuery::new(path).params(params);
        PaginatedCollection::new(HttpFetcher::new(Arc::clone(&self.http)), hydrator, query)
            .with_gate(self.gate.clone())
            .with_page_size(self.page_size)
    }

    /// OAuth2 client sharing this client's endpoint settings and gate
    pub fn oauth(&self, config: OAuthConfig) -> Result<OAuthClient> {
        let http = HttpClient::new(self.http.config().clone())?;
        Ok(OAuthClient::new(config, http, self.gate.clone()))
    }

    /// Load an unloaded resource in place
    pub async fn load(&self, resource: &mut Resource) -> Result<()> {
        resource.ensure_loaded(self).await
    }

    async fn send(&self, path: &str, params: Vec<(String, String)>) -> Result<Document> {
        let mut config = RequestConfig::new();
        for (key, value) in params {
            config = config.query(key, value);
        }

        self.gate.wait().await;
        debug!("GET {path}");
        self.http
            .get_json::<Document>(path, config)
            .await
            .map_err(|e| match e {
                Error::JsonParse(e) => Error::malformed(e.to_string()),
                other => other,
            })
    }
}

#[async_trait]
impl ResourceLoader for ApiClient {
    async fn load_document(&self, path: &str) -> Result<Document> {
        self.send(path, Vec::new()).await
    }
}
