//! Credential types

use crate::types::StringMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where an API key travels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    #[default]
    Header,
    Query,
}

/// Credential attached to every request of a client.
///
/// In configuration files this is a tagged map, e.g.
/// `{ type: api_key, name: X-Api-Key, value: ... }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfig {
    #[default]
    None,

    /// `Authorization: Bearer <token>`
    Bearer { token: String },

    /// A named key sent as a header or query parameter
    ApiKey {
        name: String,
        value: String,
        #[serde(default)]
        location: Location,
    },

    /// Arbitrary fixed headers
    Headers { headers: StringMap },
}

impl AuthConfig {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Tokens issued by the OAuth2 token endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// `None` when the server gave no lifetime
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenSet {
    /// Slack subtracted from the expiry so a token is not used right before
    /// it lapses
    const EXPIRY_MARGIN_SECS: i64 = 30;

    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            expires_at: None,
        }
    }

    /// Whether the access token is expired or about to be
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|expires_at| {
            Utc::now() + chrono::Duration::seconds(Self::EXPIRY_MARGIN_SECS) >= expires_at
        })
    }
}

impl From<&TokenSet> for AuthConfig {
    fn from(tokens: &TokenSet) -> Self {
        AuthConfig::bearer(tokens.access_token.clone())
    }
}
