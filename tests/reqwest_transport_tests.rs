//! End-to-end tests against a local mock server using the reqwest transport.

use http_alchemy::{
    Backoff, BaseUrl, ClientConfig, DataType, ErrorKind, ErrorRecord, HttpClient, HttpMethod,
    RawTransportError, RequestErrorKind, RequestSpec, ReqwestTransport, RetryOptions, Transport,
    TransportErrorKind, TransportRequest,
};
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::builder()
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .default_header("Accept", "application/json")
        .user_agent_prefix("AlchemyTests/1.0")
        .build()
        .unwrap()
}

fn client_for(server: &MockServer) -> HttpClient {
    HttpClient::new(config_for(server)).unwrap()
}

fn quick_retries(max_attempts: u32) -> RetryOptions {
    RetryOptions::new(max_attempts).backoff(Backoff::Fixed(Duration::from_millis(10)))
}

// ============================================================================
// Request construction
// ============================================================================

#[tokio::test]
async fn test_get_substitutes_path_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/a%20b/posts"))
        .and(query_param("tag", "rust"))
        .and(query_param("limit", "5"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .expect(1)
        .mount(&server)
        .await;

    let spec = RequestSpec::builder(HttpMethod::Get, "/users/{name}/posts")
        .path_param("name", "a b")
        .query_param("tag", "rust")
        .query_param("limit", 5)
        .build();

    let response = assert_ok!(client_for(&server).execute(spec).await);
    assert_eq!(response.status, 200);
    assert_eq!(response.body, json!([{"id": 1}]));
}

#[tokio::test]
async fn test_post_sends_json_body_with_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/notes"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"title": "hello", "pinned": true})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 7})))
        .expect(1)
        .mount(&server)
        .await;

    let spec = RequestSpec::builder(HttpMethod::Post, "/notes")
        .body(json!({"title": "hello", "pinned": true}))
        .build();

    let response = assert_ok!(client_for(&server).execute(spec).await);
    assert_eq!(response.status, 201);
    assert_eq!(response.body, json!({"id": 7}));
}

#[tokio::test]
async fn test_form_body_is_urlencoded() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/settings"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("theme=dark%20mode"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let spec = RequestSpec::builder(HttpMethod::Put, "/settings")
        .body(json!({"theme": "dark mode"}))
        .body_type(DataType::FormUrlEncoded)
        .build();

    let response = assert_ok!(client_for(&server).execute(spec).await);
    assert_eq!(response.status, 204);
    assert_eq!(response.body, serde_json::Value::Null);
}

#[tokio::test]
async fn test_caller_headers_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("x-trace", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("plain"))
        .expect(1)
        .mount(&server)
        .await;

    let spec = RequestSpec::builder(HttpMethod::Get, "/me")
        .header("X-Trace", "abc")
        .build();
    let response = assert_ok!(client_for(&server).execute(spec).await);
    assert_eq!(response.body, json!("plain"));
}

// ============================================================================
// Failures and retries
// ============================================================================

#[tokio::test]
async fn test_transport_returns_non_success_status_unclassified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).insert_header("x-request-id", "req-1"))
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new().unwrap();
    let raw = assert_ok!(
        transport
            .send(TransportRequest {
                method: HttpMethod::Get,
                url: format!("{}/health", server.uri()),
                headers: HashMap::new(),
                body: None,
                timeout: Duration::from_secs(5),
            })
            .await
    );

    assert_eq!(raw.status, 503);
    assert_eq!(raw.header("X-Request-Id"), Some("req-1"));
}

#[tokio::test]
async fn test_server_errors_are_retried_until_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let spec = RequestSpec::builder(HttpMethod::Get, "/flaky")
        .retry_options(quick_retries(2))
        .build();

    let response = assert_ok!(client_for(&server).execute(spec).await);
    assert_eq!(response.body, json!({"ok": true}));
}

#[tokio::test]
async fn test_error_payload_and_request_id_in_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/items/3"))
        .respond_with(
            ResponseTemplate::new(422)
                .insert_header("x-request-id", "req-42")
                .set_body_json(json!({"errors": {"name": ["is taken"]}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let spec = RequestSpec::builder(HttpMethod::Delete, "/items/{id}")
        .path_param("id", 3)
        .retry_options(quick_retries(3))
        .build();

    let error = assert_err!(client_for(&server).execute(spec).await);
    match error {
        ErrorRecord::Response(e) => {
            assert_eq!(e.status, 422);
            assert!(e.message.contains("is taken"));
            assert!(e.message.ends_with("(request id: req-42)"));
            assert_eq!(e.response.body, json!({"errors": {"name": ["is taken"]}}));
        }
        other => panic!("expected a response error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let spec = RequestSpec::builder(HttpMethod::Get, "/slow")
        .timeout(Duration::from_millis(100))
        .retry_options(RetryOptions::new(0))
        .build();

    match assert_err!(client_for(&server).execute(spec).await) {
        ErrorRecord::Request(e) => assert_eq!(e.kind, RequestErrorKind::Timeout),
        other => panic!("expected a timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_host_is_network_error() {
    // Nothing listens on port 1 locally.
    let uri = "http://127.0.0.1:1".to_string();

    let transport = ReqwestTransport::new().unwrap();
    let error: RawTransportError = assert_err!(
        transport
            .send(TransportRequest {
                method: HttpMethod::Get,
                url: format!("{uri}/nothing"),
                headers: HashMap::new(),
                body: None,
                timeout: Duration::from_secs(5),
            })
            .await
    );
    assert_eq!(error.kind, TransportErrorKind::Connect);

    let config = ClientConfig::builder()
        .base_url(BaseUrl::new(uri.as_str()).unwrap())
        .build()
        .unwrap();
    let spec = RequestSpec::builder(HttpMethod::Get, "/nothing")
        .retry_options(quick_retries(1))
        .build();
    let error = assert_err!(HttpClient::new(config).unwrap().execute(spec).await);
    assert_eq!(error.kind(), ErrorKind::Request);
}
