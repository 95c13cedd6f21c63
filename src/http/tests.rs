//! Tests for the HTTP transport

use super::client::summarize_errors;
use super::*;
use crate::auth::AuthConfig;
use crate::error::Error;
use pretty_assertions::assert_eq;
use reqwest::Method;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpClient {
    HttpClient::new(HttpClientConfig::new(server.uri())).unwrap()
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_default_config_accepts_json_api() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert!(config.base_url.is_none());
    assert_eq!(
        config.default_headers.get("Accept").map(String::as_str),
        Some(JSON_API_MEDIA_TYPE)
    );
    assert!(config.user_agent.starts_with("jsonapi-pager/"));
}

#[test]
fn test_config_overrides() {
    let config = HttpClientConfig::new("https://api.example.com/v2")
        .with_timeout(Duration::from_secs(5))
        .with_header("X-Client", "pager")
        .with_user_agent("pager-tests/1.0");

    assert_eq!(config.base_url.as_deref(), Some("https://api.example.com/v2"));
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(config.default_headers.len(), 2);
    assert_eq!(config.user_agent, "pager-tests/1.0");
}

#[test]
fn test_request_config_keeps_query_order() {
    let request = RequestConfig::new()
        .query("page[offset]", "0")
        .query("page[limit]", "50")
        .header("X-Trace", "t1");

    let keys: Vec<&str> = request.query.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["page[offset]", "page[limit]"]);
    assert!(request.body.is_none());
}

#[test]
fn test_resolve() {
    let client = HttpClient::new(HttpClientConfig::new("https://api.example.com/v2/")).unwrap();
    assert_eq!(client.resolve("/images"), "https://api.example.com/v2/images");
    assert_eq!(client.resolve("images/1"), "https://api.example.com/v2/images/1");
    assert_eq!(
        client.resolve("https://cdn.example.com/a.png"),
        "https://cdn.example.com/a.png"
    );

    let rootless = HttpClient::new(HttpClientConfig::default()).unwrap();
    assert_eq!(rootless.resolve("images"), "images");
}

#[test]
fn test_summarize_errors() {
    let body = r#"{"errors": [{"title": "Not Found", "detail": "No image with id 'x'"}, {"title": "Gone"}]}"#;
    assert_eq!(summarize_errors(body), "No image with id 'x'; Gone");
    assert_eq!(summarize_errors("upstream down"), "upstream down");
    assert_eq!(summarize_errors(r#"{"errors": [{}]}"#), r#"{"errors": [{}]}"#);
}

#[test]
fn test_debug_hides_credentials() {
    let plain = HttpClient::new(HttpClientConfig::default()).unwrap();
    assert!(format!("{plain:?}").contains("authenticated: false"));

    let authed =
        HttpClient::with_auth(HttpClientConfig::default(), AuthConfig::bearer("hidden")).unwrap();
    let rendered = format!("{authed:?}");
    assert!(rendered.contains("authenticated: true"));
    assert!(!rendered.contains("hidden"));
}

// ============================================================================
// Requests
// ============================================================================

#[tokio::test]
async fn test_get_json_with_query_and_accept() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/images"))
        .and(header("Accept", JSON_API_MEDIA_TYPE))
        .and(query_param("page[limit]", "50"))
        .and(query_param("page[offset]", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let body: Value = client
        .get_json(
            "/images",
            RequestConfig::new()
                .query("page[limit]", "50")
                .query("page[offset]", "100"),
        )
        .await
        .unwrap();

    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_request_header_overrides_default() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/images"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .send(
            Method::GET,
            "/images",
            RequestConfig::new().header("ACCEPT", "application/json"),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_post_json_sends_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .and(body_json(json!({"grant_type": "refresh_token"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let body: Value = client
        .post_json(
            "auth/token",
            RequestConfig::new().json(json!({"grant_type": "refresh_token"})),
        )
        .await
        .unwrap();

    assert_eq!(body, json!({"ok": true}));
}

#[tokio::test]
async fn test_bearer_credential_attached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/@me"))
        .and(header("Authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client =
        HttpClient::with_auth(HttpClientConfig::new(server.uri()), AuthConfig::bearer("tok-123"))
            .unwrap();

    let response = client
        .send(Method::GET, "/users/@me", RequestConfig::new())
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_error_status_carries_error_details() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/images/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errors": [{"status": "404", "title": "Not Found", "detail": "Image not found"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .get_json::<Value>("/images/missing", RequestConfig::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 404, ref body } if body == "Image not found"));
    assert!(err.is_upstream());
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/images"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .send(Method::GET, "/images", RequestConfig::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 503, ref body } if body == "maintenance"));
}

#[tokio::test]
async fn test_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let config = HttpClientConfig::new(server.uri()).with_timeout(Duration::from_millis(50));
    let client = HttpClient::new(config).unwrap();
    let err = client
        .send(Method::GET, "/slow", RequestConfig::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Timeout { timeout_ms: 50 }));
}

#[tokio::test]
async fn test_invalid_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client
        .get_json::<Value>("/broken", RequestConfig::new())
        .await;

    assert!(matches!(result, Err(Error::JsonParse(_))));
}

#[tokio::test]
async fn test_timeout_while_reading_body() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Headers arrive at once, the body never completes
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await;
        socket
            .write_all(
                b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 64\r\n\r\n{\"data\":",
            )
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
    });

    let config =
        HttpClientConfig::new(format!("http://{addr}")).with_timeout(Duration::from_millis(200));
    let client = HttpClient::new(config).unwrap();
    let result = client.get_json::<Value>("/images", RequestConfig::new()).await;

    assert!(matches!(result, Err(Error::Timeout { timeout_ms: 200 })));
}
