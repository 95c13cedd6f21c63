//! Authentication module
//!
//! Supports: API Key, Bearer, Custom Headers, and the OAuth2
//! authorization-code flow used to obtain bearer tokens.
//!
//! The `Authenticator` applies a static credential to every request;
//! `OAuthClient` exchanges an authorization code for a `TokenSet`.

mod authenticator;
mod oauth;
mod types;

pub use authenticator::Authenticator;
pub use oauth::{OAuthClient, OAuthConfig};
pub use types::{AuthConfig, Location, TokenSet};

#[cfg(test)]
mod tests;
