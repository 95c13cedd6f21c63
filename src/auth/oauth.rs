//! OAuth2 authorization-code flow
//!
//! The service issues bearer tokens through a standard authorization-code
//! exchange: the user is sent to the authorization URL, the redirect carries
//! a `code`, and `login` trades that code for tokens at the token endpoint.

use super::types::TokenSet;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RateGate, RequestConfig};
use chrono::{TimeZone, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};
use url::Url;

/// OAuth2 client registration
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// Client ID
    pub client_id: String,
    /// Client secret
    pub client_secret: String,
    /// Redirect URI registered for the client
    pub redirect_uri: String,
    /// Requested scopes
    pub scopes: Vec<String>,
    /// Authorization endpoint
    pub authorize_url: String,
    /// Token endpoint
    pub token_url: String,
}

impl OAuthConfig {
    /// Registration using the service's standard endpoints under `base_url`
    pub fn new(
        base_url: &str,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            scopes: Vec::new(),
            authorize_url: format!("{base}/auth/authorize"),
            token_url: format!("{base}/auth/token"),
        }
    }

    /// Set requested scopes
    #[must_use]
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<f64>,
}

impl TokenResponse {
    fn into_token_set(self) -> TokenSet {
        let expires_at = self
            .expires_at
            .and_then(|secs| Utc.timestamp_opt(secs as i64, 0).single())
            .or_else(|| {
                self.expires_in
                    .map(|secs| Utc::now() + chrono::Duration::seconds(secs))
            });

        TokenSet {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
        }
    }
}

/// Client for the OAuth2 authorization-code flow
#[derive(Debug)]
pub struct OAuthClient {
    config: OAuthConfig,
    http: HttpClient,
    gate: RateGate,
}

impl OAuthClient {
    /// Create a client; token requests pass through `gate`
    pub fn new(config: OAuthConfig, http: HttpClient, gate: RateGate) -> Self {
        Self { config, http, gate }
    }

    /// Registration in use
    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// URL the user must visit to grant access
    pub fn authorization_url(&self, state: &str) -> Result<String> {
        let mut url = Url::parse(&self.config.authorize_url)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("response_type", "code")
                .append_pair("client_id", &self.config.client_id)
                .append_pair("redirect_uri", &self.config.redirect_uri);
            if !self.config.scopes.is_empty() {
                pairs.append_pair("scope", &self.config.scopes.join(" "));
            }
            pairs.append_pair("state", state);
        }
        Ok(url.into())
    }

    /// Exchange an authorization code for tokens
    pub async fn login(&self, code: &str) -> Result<TokenSet> {
        let body = json!({
            "code": code,
            "client_id": self.config.client_id,
            "client_secret": self.config.client_secret,
            "redirect_uri": self.config.redirect_uri,
            "grant_type": "authorization_code",
        });

        let tokens = self.token_request(body).await?;
        info!("Obtained OAuth2 access token for client {}", self.config.client_id);
        Ok(tokens)
    }

    /// Trade a refresh token for a fresh access token
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenSet> {
        let body = json!({
            "refresh_token": refresh_token,
            "client_id": self.config.client_id,
            "client_secret": self.config.client_secret,
            "grant_type": "refresh_token",
        });

        self.token_request(body).await
    }

    async fn token_request(&self, body: serde_json::Value) -> Result<TokenSet> {
        self.gate.wait().await;
        debug!("POST {}", self.config.token_url);

        let request = RequestConfig::new()
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .json(body);

        let token: TokenResponse = self
            .http
            .post_json(&self.config.token_url, request)
            .await
            .map_err(|e| match e {
                Error::HttpStatus { status, body } => Error::oauth2(format!(
                    "Token request failed with status {status}: {body}"
                )),
                Error::JsonParse(e) => Error::oauth2(format!("Invalid token response: {e}")),
                other => other,
            })?;
        Ok(token.into_token_set())
    }
}

