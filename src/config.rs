//! Client configuration
//!
//! `ClientConfig` holds everything needed to talk to the service: endpoint,
//! paging, timeouts, request spacing and credentials. It can be built in code
//! or loaded from a YAML or JSON file.

use crate::auth::AuthConfig;
use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClientConfig, RateGateConfig, DEFAULT_MIN_INTERVAL};
use crate::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::types::{OptionStringExt, StringMap};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default service endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.nekosapi.com/v2";

// ============================================================================
// Client Config
// ============================================================================

/// Service client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Base URL of the service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Items per page request (1 to 50)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Minimum spacing between requests in milliseconds
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,

    /// User-Agent header override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Extra headers sent with every request
    #[serde(default, skip_serializing_if = "StringMap::is_empty")]
    pub headers: StringMap,

    /// Credential section; a non-empty `token` takes precedence
    #[serde(default, skip_serializing_if = "AuthConfig::is_none")]
    pub auth: AuthConfig,

    /// Bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_min_interval_ms() -> u64 {
    DEFAULT_MIN_INTERVAL.as_millis() as u64
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            timeout_ms: default_timeout_ms(),
            min_interval_ms: default_min_interval_ms(),
            user_agent: None,
            headers: StringMap::new(),
            auth: AuthConfig::None,
            token: None,
        }
    }
}

impl ClientConfig {
    /// Load from a YAML or JSON file. YAML parsing accepts both.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parse and validate a YAML (or JSON) document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(Error::config(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }
        if self.timeout_ms == 0 {
            return Err(Error::config("timeout_ms must be positive"));
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| Error::config(format!("invalid base_url '{}': {e}", self.base_url)))?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    /// HTTP client settings
    pub fn http_config(&self) -> HttpClientConfig {
        let config = HttpClientConfig::new(&self.base_url).with_timeout(self.timeout());
        let config = match self.user_agent {
            Some(ref agent) => config.with_user_agent(agent),
            None => config,
        };
        self.headers
            .iter()
            .fold(config, |config, (key, value)| config.with_header(key, value))
    }

    /// Rate gate settings
    pub fn gate_config(&self) -> RateGateConfig {
        RateGateConfig::new(self.min_interval())
    }

    /// Credentials to attach to requests
    pub fn auth_config(&self) -> AuthConfig {
        match self.token.clone().none_if_empty() {
            Some(token) => AuthConfig::Bearer { token },
            None => self.auth.clone(),
        }
    }
}
