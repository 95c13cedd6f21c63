//! Credential application

use super::types::{AuthConfig, Location};
use reqwest::RequestBuilder;

/// Attaches the configured credential to outgoing requests
#[derive(Debug, Clone, Default)]
pub struct Authenticator {
    config: AuthConfig,
}

impl Authenticator {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Whether any credential is sent
    pub fn is_active(&self) -> bool {
        !self.config.is_none()
    }

    /// Add the credential to `request`
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self.config {
            AuthConfig::None => request,
            AuthConfig::Bearer { ref token } => request.bearer_auth(token),
            AuthConfig::ApiKey {
                ref name,
                ref value,
                location: Location::Header,
            } => request.header(name.as_str(), value.as_str()),
            AuthConfig::ApiKey {
                ref name,
                ref value,
                location: Location::Query,
            } => request.query(&[(name, value)]),
            AuthConfig::Headers { ref headers } => headers
                .iter()
                .fold(request, |request, (name, value)| {
                    request.header(name.as_str(), value.as_str())
                }),
        }
    }
}
