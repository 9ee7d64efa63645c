//! Integration tests for `ApiClient` using wiremock.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use courier::providers::StaticHeaders;
use courier::{ApiClient, ApiError, BoxError, DateDecoding, Endpoint, HeaderProvider, Headers, Method};
use serde::{Deserialize, Serialize};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct User {
    id: u64,
    name: String,
}

#[derive(Debug, PartialEq, Eq, Deserialize)]
struct Id {
    id: u64,
}

fn bearer(token: &str) -> Headers {
    Headers::from([("Authorization".to_string(), format!("Bearer {token}"))])
}

/// Provider whose headers change only after `refreshed_headers`.
#[derive(Debug, Default)]
struct RotatingProvider {
    refreshes: AtomicUsize,
}

impl RotatingProvider {
    fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

impl HeaderProvider for RotatingProvider {
    async fn current_headers(&self) -> Result<Headers, BoxError> {
        let token = if self.refreshes.load(Ordering::SeqCst) == 0 {
            "stale"
        } else {
            "fresh"
        };
        Ok(bearer(token))
    }

    async fn refreshed_headers(&self) -> Result<Headers, BoxError> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        Ok(bearer("fresh"))
    }
}

/// Provider that always fails.
#[derive(Debug)]
struct FailingProvider;

impl HeaderProvider for FailingProvider {
    async fn current_headers(&self) -> Result<Headers, BoxError> {
        Err("no token available".into())
    }

    async fn refreshed_headers(&self) -> Result<Headers, BoxError> {
        Err("no token available".into())
    }
}

fn target(server: &MockServer, route: &str) -> url::Url {
    format!("{}{route}", server.uri()).parse().expect("url")
}

#[tokio::test]
async fn get_decodes_typed_record() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 1, "name": "a"})),
        )
        .mount(&server)
        .await;

    let client = ApiClient::new(StaticHeaders::default());
    let user: User = client.get(target(&server, "/users/1")).await.expect("user");

    assert_eq!(
        user,
        User {
            id: 1,
            name: "a".to_string()
        }
    );
}

#[tokio::test]
async fn fetch_bytes_returns_body_unmodified() {
    let server = MockServer::start().await;

    let payload: &[u8] = b"\x00\x01binary body\xff";
    Mock::given(method("GET"))
        .and(path("/blob"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(payload))
        .mount(&server)
        .await;

    let client = ApiClient::new(StaticHeaders::default());
    let bytes = client
        .fetch_bytes(Endpoint::get(target(&server, "/blob")))
        .await
        .expect("bytes");

    assert_eq!(bytes.as_ref(), payload);
}

#[tokio::test]
async fn refresh_retry_on_401() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("Authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("Authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let provider = Arc::new(RotatingProvider::default());
    let client = ApiClient::new(Arc::clone(&provider));

    let id: Id = client
        .send_decoded(Endpoint::get(target(&server, "/me")))
        .await
        .expect("decoded after retry");

    assert_eq!(id, Id { id: 1 });
    assert_eq!(provider.refresh_count(), 1);
}

#[tokio::test]
async fn second_401_is_not_retried_again() {
    let server = MockServer::start().await;

    // Both the stale and the fresh attempt are rejected.
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"code": 9, "description": "expired"})),
        )
        .expect(2)
        .mount(&server)
        .await;

    let provider = Arc::new(RotatingProvider::default());
    let client = ApiClient::new(Arc::clone(&provider));

    let err = client
        .fetch_bytes(Endpoint::get(target(&server, "/me")))
        .await
        .expect_err("still unauthorized");

    // Exactly one refresh, then normal non-2xx classification.
    assert_eq!(provider.refresh_count(), 1);
    assert_eq!(err.code, 9);
    assert_eq!(err.message, "expired");
    assert!(err.raw_body.is_none());
}

#[tokio::test]
async fn explicit_headers_never_trigger_a_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let provider = Arc::new(RotatingProvider::default());
    let client = ApiClient::new(Arc::clone(&provider));

    let endpoint = Endpoint::builder(target(&server, "/me"), Method::Get)
        .explicit_headers(bearer("pinned"))
        .build();
    let err = client.fetch_bytes(endpoint).await.expect_err("401");

    assert_eq!(provider.refresh_count(), 0);
    assert_eq!(err.code, 401);
}

#[tokio::test]
async fn structured_error_payload_is_decoded_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fail"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(serde_json::json!({"code": 42, "description": "boom"})),
        )
        .mount(&server)
        .await;

    let client = ApiClient::new(StaticHeaders::default());
    let err = client
        .fetch_bytes(Endpoint::get(target(&server, "/fail")))
        .await
        .expect_err("server error");

    assert_eq!(err.code, 42);
    assert_eq!(err.message, "boom");
    assert!(err.raw_body.is_none());
}

#[tokio::test]
async fn opaque_error_body_is_synthesized_from_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503).set_body_string("service unavailable"))
        .mount(&server)
        .await;

    let client = ApiClient::new(StaticHeaders::default());
    let err = client
        .fetch_bytes(Endpoint::get(target(&server, "/down")))
        .await
        .expect_err("service unavailable");

    assert_eq!(err.code, 503);
    assert_eq!(err.message, "service unavailable");
    assert_eq!(
        err.raw_body.as_deref(),
        Some(b"service unavailable".as_slice())
    );
}

#[tokio::test]
async fn transport_failure_is_a_client_error() {
    let client = ApiClient::new(StaticHeaders::default());

    // Nothing listens here.
    let url: url::Url = "http://127.0.0.1:1/".parse().expect("url");
    let err = client
        .fetch_bytes(Endpoint::get(url))
        .await
        .expect_err("connection refused");

    assert_eq!(err.code, ApiError::CLIENT_FAILURE);
    assert!(err.raw_body.is_none());
}

#[tokio::test]
async fn per_endpoint_timeout_is_honored() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let client = ApiClient::new(StaticHeaders::default());
    let endpoint = Endpoint::builder(target(&server, "/slow"), Method::Get)
        .timeout(Duration::from_millis(100))
        .build();

    let err = client.fetch_bytes(endpoint).await.expect_err("timeout");

    assert_eq!(err.code, ApiError::CLIENT_FAILURE);
    assert_eq!(err.message, "request timeout");
    assert!(err.raw_body.is_none());
}

#[tokio::test]
async fn post_body_round_trips() {
    let server = MockServer::start().await;

    let input = User {
        id: 0,
        name: "b".to_string(),
    };

    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(&input))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(StaticHeaders::default());
    let endpoint = Endpoint::builder(
        target(&server, "/users"),
        Method::post(Some(&input)).expect("encode"),
    )
    .build();

    client.send(endpoint).await.expect("created");
}

#[tokio::test]
async fn get_sends_no_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(wiremock::matchers::body_bytes(Vec::new()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(StaticHeaders::default());
    client
        .send(Endpoint::get(target(&server, "/users")))
        .await
        .expect("empty-bodied GET");
}

#[tokio::test]
async fn decode_failure_surfaces_as_client_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "abc"})))
        .mount(&server)
        .await;

    let client = ApiClient::new(StaticHeaders::default());
    let err = client
        .send_decoded::<Id>(Endpoint::get(target(&server, "/me")))
        .await
        .expect_err("type mismatch");

    assert_eq!(err.code, ApiError::CLIENT_FAILURE);
    assert!(err.message.contains("id"), "path missing: {}", err.message);
    assert!(err.raw_body.is_none());
}

#[tokio::test]
async fn date_decoding_policy_applies_to_typed_results() {
    #[derive(Debug, Deserialize)]
    struct Session {
        #[serde(with = "courier::datetime")]
        expires_at: chrono::DateTime<chrono::Utc>,
    }

    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/session"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"expires_at": 1700000000})),
        )
        .mount(&server)
        .await;

    let client = ApiClient::new(StaticHeaders::default());
    let endpoint = Endpoint::builder(target(&server, "/session"), Method::Get)
        .date_decoding(DateDecoding::EpochSeconds)
        .build();

    let session: Session = client.send_decoded(endpoint).await.expect("session");
    assert_eq!(session.expires_at.timestamp(), 1_700_000_000);
}

#[tokio::test]
async fn provider_failure_is_a_client_error() {
    let client = ApiClient::new(FailingProvider);

    let url: url::Url = "http://127.0.0.1:1/".parse().expect("url");
    let err = client
        .fetch_bytes(Endpoint::get(url))
        .await
        .expect_err("provider failure");

    assert_eq!(err.code, ApiError::CLIENT_FAILURE);
    assert!(err.message.contains("header provider failure"));
    assert!(err.message.contains("no token available"));
}
