//! Tests for the auth module

use super::*;
use crate::error::Error;
use crate::http::{HttpClient, HttpClientConfig, RateGate};
use std::collections::HashMap;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn build(auth: &Authenticator) -> reqwest::Request {
    auth.apply(reqwest::Client::new().get("https://api.test/images"))
        .build()
        .unwrap()
}

#[test]
fn test_no_auth() {
    let auth = Authenticator::default();
    assert!(!auth.is_active());
    assert!(build(&auth).headers().get("Authorization").is_none());
}

#[test]
fn test_api_key_header() {
    let auth = Authenticator::new(AuthConfig::ApiKey {
        name: "X-API-Key".to_string(),
        value: "test-key-123".to_string(),
        location: Location::Header,
    });

    assert!(auth.is_active());
    assert_eq!(build(&auth).headers().get("X-API-Key").unwrap(), "test-key-123");
}

#[test]
fn test_api_key_query() {
    let auth = Authenticator::new(AuthConfig::ApiKey {
        name: "apikey".to_string(),
        value: "secret123".to_string(),
        location: Location::Query,
    });

    let built = build(&auth);
    assert!(built.url().query().unwrap().contains("apikey=secret123"));
    assert!(built.headers().get("apikey").is_none());
}

#[test]
fn test_bearer_auth() {
    let built = build(&Authenticator::new(AuthConfig::bearer("abc")));
    assert_eq!(built.headers().get("Authorization").unwrap(), "Bearer abc");
}

#[test]
fn test_fixed_headers() {
    let headers = HashMap::from([
        ("X-Client".to_string(), "pager".to_string()),
        ("X-Team".to_string(), "core".to_string()),
    ]);
    let built = build(&Authenticator::new(AuthConfig::Headers { headers }));

    assert_eq!(built.headers().get("X-Client").unwrap(), "pager");
    assert_eq!(built.headers().get("X-Team").unwrap(), "core");
}

fn oauth_client(server: &MockServer) -> OAuthClient {
    let config = OAuthConfig::new(&server.uri(), "client-1", "secret-1", "https://app/cb")
        .with_scopes(vec!["image:read".to_string(), "user:read".to_string()]);
    OAuthClient::new(
        config,
        HttpClient::new(HttpClientConfig::default()).unwrap(),
        RateGate::disabled(),
    )
}

#[tokio::test]
async fn test_authorization_url() {
    let server = MockServer::start().await;
    let client = oauth_client(&server);

    let url = client.authorization_url("xyz").unwrap();
    let parsed = url::Url::parse(&url).unwrap();
    let pairs: HashMap<_, _> = parsed.query_pairs().into_owned().collect();

    assert_eq!(parsed.path(), "/auth/authorize");
    assert_eq!(pairs.get("response_type").unwrap(), "code");
    assert_eq!(pairs.get("client_id").unwrap(), "client-1");
    assert_eq!(pairs.get("redirect_uri").unwrap(), "https://app/cb");
    assert_eq!(pairs.get("scope").unwrap(), "image:read user:read");
    assert_eq!(pairs.get("state").unwrap(), "xyz");
}

#[tokio::test]
async fn test_login_exchanges_code() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .and(header("Accept", "application/json"))
        .and(body_partial_json(serde_json::json!({
            "code": "the-code",
            "client_id": "client-1",
            "client_secret": "secret-1",
            "redirect_uri": "https://app/cb",
            "grant_type": "authorization_code"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "access-1",
            "refresh_token": "refresh-1",
            "expires_in": 3600,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = oauth_client(&server).login("the-code").await.unwrap();

    assert_eq!(tokens.access_token, "access-1");
    assert_eq!(tokens.refresh_token.as_deref(), Some("refresh-1"));
    assert!(tokens.expires_at.is_some());
    assert!(!tokens.is_expired());
}

#[tokio::test]
async fn test_refresh_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .and(body_partial_json(serde_json::json!({
            "refresh_token": "refresh-1",
            "grant_type": "refresh_token"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "access-2",
            "expires_at": 4102444800.0
        })))
        .mount(&server)
        .await;

    let tokens = oauth_client(&server).refresh("refresh-1").await.unwrap();

    assert_eq!(tokens.access_token, "access-2");
    assert_eq!(tokens.expires_at.unwrap().timestamp(), 4_102_444_800);
}

#[tokio::test]
async fn test_login_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
        .mount(&server)
        .await;

    let err = oauth_client(&server).login("bad").await.unwrap_err();

    assert!(matches!(err, Error::OAuth2 { ref message } if message.contains("invalid_grant")));
}
