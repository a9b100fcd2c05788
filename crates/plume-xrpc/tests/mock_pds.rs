//! Mock PDS tests for the XRPC client.
//!
//! These tests use wiremock to simulate a PDS server and test the client's
//! behavior without requiring network access or real credentials.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use plume_core::{AccessToken, AtUri, Credentials, Error, PdsUrl, RefreshToken, SessionService};
use plume_lexicon::{UnrecognizedReason, Variant};
use plume_session::{RefreshOutcome, SessionConfig, SessionManager};
use plume_xrpc::XrpcClient;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const POST_URI: &str = "at://did:plc:test123/app.bsky.feed.post/3kabc";
const POST_CID: &str = "bafyreiao6dcjaspidyacksbr66qomo2wqpweituindrdqp3n3tb2t66wti";

/// Helper to create a client for a mock server.
fn mock_client(server: &MockServer) -> XrpcClient {
    // HTTP is only accepted for loopback hosts
    let pds = PdsUrl::new(format!("http://127.0.0.1:{}", server.address().port())).unwrap();
    XrpcClient::new(pds).unwrap()
}

fn jwt(exp_in: i64) -> String {
    let exp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
        + exp_in;
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"ES256K","typ":"refresh+jwt"}"#);
    let body = URL_SAFE_NO_PAD.encode(json!({"scope": "com.atproto.refresh", "exp": exp}).to_string());
    format!("{}.{}.sig", header, body)
}

// ============================================================================
// Authentication Tests
// ============================================================================

#[tokio::test]
async fn test_login_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.server.createSession"))
        .and(body_json(json!({
            "identifier": "alice.test",
            "password": "secret123"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "did": "did:plc:test123",
            "handle": "alice.test",
            "accessJwt": "test-access-token",
            "refreshJwt": "test-refresh-token",
            "email": "alice@example.com"
        })))
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let session = client
        .create_session(&Credentials::new("alice.test", "secret123"))
        .await
        .unwrap();

    assert_eq!(session.did.as_str(), "did:plc:test123");
    assert_eq!(session.handle.as_str(), "alice.test");
    assert_eq!(session.access_token.as_str(), "test-access-token");
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.server.createSession"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "AuthenticationRequired",
            "message": "Invalid identifier or password"
        })))
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let err = client
        .create_session(&Credentials::new("bad@user", "wrongpass"))
        .await
        .unwrap_err();

    assert!(err.is_auth_error());
    let Error::Protocol(protocol) = &err else {
        panic!("expected protocol error, got {:?}", err);
    };
    assert_eq!(protocol.status, 401);
    assert_eq!(protocol.error.as_deref(), Some("AuthenticationRequired"));
    assert!(err.to_string().contains("401"));
}

#[tokio::test]
async fn test_refresh_sends_refresh_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.server.refreshSession"))
        .and(header("authorization", "Bearer old-refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "did": "did:plc:test123",
            "handle": "alice.test",
            "accessJwt": "new-access-token",
            "refreshJwt": "new-refresh-token"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let session = client
        .refresh_session(&RefreshToken::new("old-refresh-token"))
        .await
        .unwrap();

    assert_eq!(session.access_token.as_str(), "new-access-token");
    assert_eq!(session.refresh_token.as_str(), "new-refresh-token");
}

#[tokio::test]
async fn test_refresh_expired_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.server.refreshSession"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "ExpiredToken",
            "message": "Token has expired"
        })))
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let err = client
        .refresh_session(&RefreshToken::new("expired"))
        .await
        .unwrap_err();

    assert!(err.is_auth_error());
}

#[tokio::test]
async fn test_get_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/xrpc/com.atproto.server.getSession"))
        .and(header("authorization", "Bearer access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "did": "did:plc:test123",
            "handle": "alice.test",
            "active": true
        })))
        .mount(&server)
        .await;

    let info = mock_client(&server)
        .get_session(&AccessToken::new("access"))
        .await
        .unwrap();
    assert_eq!(info.did.as_str(), "did:plc:test123");
    assert_eq!(info.active, Some(true));
}

// ============================================================================
// Record Tests
// ============================================================================

#[tokio::test]
async fn test_get_record_decodes_value() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/xrpc/com.atproto.repo.getRecord"))
        .and(query_param("repo", "did:plc:test123"))
        .and(query_param("collection", "app.bsky.feed.post"))
        .and(query_param("rkey", "3kabc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uri": POST_URI,
            "cid": POST_CID,
            "value": {
                "$type": "app.bsky.feed.post",
                "text": "hello from the mock",
                "createdAt": "2024-05-01T12:00:00.000Z",
                "embed": {
                    "$type": "app.bsky.embed.external",
                    "external": {"uri": "https://example.com", "title": "Example", "description": ""}
                }
            }
        })))
        .mount(&server)
        .await;

    let uri = AtUri::new(POST_URI).unwrap();
    let output = mock_client(&server).get_record(&uri, None).await.unwrap();

    assert_eq!(output.uri, uri);
    assert_eq!(output.cid.unwrap().to_string(), POST_CID);
    let Variant::Post(post) = output.value else {
        panic!("expected a post, got {:?}", output.value);
    };
    assert_eq!(post.text, "hello from the mock");
    assert!(matches!(post.embed.as_deref(), Some(Variant::External(_))));
}

#[tokio::test]
async fn test_get_record_unknown_type() {
    let server = MockServer::start().await;
    let value = json!({"$type": "com.example.widget", "size": 3});

    Mock::given(method("GET"))
        .and(path("/xrpc/com.atproto.repo.getRecord"))
        .and(header("authorization", "Bearer access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uri": "at://did:plc:test123/com.example.widget/1",
            "value": value
        })))
        .mount(&server)
        .await;

    let uri = AtUri::new("at://did:plc:test123/com.example.widget/1").unwrap();
    let output = mock_client(&server)
        .get_record(&uri, Some("Bearer access"))
        .await
        .unwrap();

    let unrecognized = output.value.as_unrecognized().unwrap();
    assert_eq!(unrecognized.reason(), &UnrecognizedReason::UnknownTag);
    assert_eq!(unrecognized.payload(), &value);
}

#[tokio::test]
async fn test_get_record_requires_record_uri() {
    let server = MockServer::start().await;
    let uri = AtUri::new("at://did:plc:test123").unwrap();

    let err = mock_client(&server).get_record(&uri, None).await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[tokio::test]
async fn test_error_without_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/xrpc/com.atproto.repo.getRecord"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let uri = AtUri::new(POST_URI).unwrap();
    let err = mock_client(&server).get_record(&uri, None).await.unwrap_err();

    let Error::Protocol(protocol) = err else {
        panic!("expected protocol error");
    };
    assert_eq!(protocol.status, 502);
    assert_eq!(protocol.error, None);
}

#[tokio::test]
async fn test_unreachable_pds() {
    let pds = PdsUrl::new("http://127.0.0.1:9").unwrap();
    let client = XrpcClient::new(pds).unwrap();

    let err = client
        .refresh_session(&RefreshToken::new("token"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}

// ============================================================================
// Session Manager over XRPC
// ============================================================================

#[tokio::test]
async fn test_manager_login_and_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.server.createSession"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "did": "did:plc:test123",
            "handle": "alice.test",
            "accessJwt": "first-access",
            "refreshJwt": "first-refresh"
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.server.refreshSession"))
        .and(header("authorization", "Bearer first-refresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "did": "did:plc:test123",
                    "handle": "alice.test",
                    "accessJwt": "second-access",
                    "refreshJwt": "second-refresh"
                }))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let manager = SessionManager::new(Arc::new(mock_client(&server)), SessionConfig::default());
    manager
        .login(&Credentials::new("alice.test", "secret"))
        .await
        .unwrap();
    assert_eq!(manager.current_auth_header().as_deref(), Some("Bearer first-access"));

    let (a, b) = tokio::join!(manager.refresh_now(), manager.refresh_now());
    let outcomes = [a.unwrap(), b.unwrap()];
    assert_eq!(
        outcomes.iter().filter(|o| **o == RefreshOutcome::Coalesced).count(),
        1
    );
    assert_eq!(manager.current_auth_header().as_deref(), Some("Bearer second-access"));
}

#[tokio::test]
async fn test_manager_arms_from_refresh_token_expiry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.server.createSession"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "did": "did:plc:test123",
            "handle": "alice.test",
            "accessJwt": "access",
            "refreshJwt": jwt(3600)
        })))
        .mount(&server)
        .await;

    let manager = SessionManager::new(
        Arc::new(mock_client(&server)),
        SessionConfig::new().with_auto_renew(true),
    );
    manager
        .login(&Credentials::new("alice.test", "secret"))
        .await
        .unwrap();

    let delay = manager.next_renewal_delay().unwrap();
    assert!(delay > Duration::from_secs(3590) && delay <= Duration::from_secs(3600));
    manager.dispose();
}

#[tokio::test]
async fn test_manager_renews_after_unauthorized_read() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/xrpc/com.atproto.repo.getRecord"))
        .and(header("authorization", "Bearer stale-access"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "ExpiredToken",
            "message": "Token has expired"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.server.refreshSession"))
        .and(header("authorization", "Bearer stale-refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "did": "did:plc:test123",
            "handle": "alice.test",
            "accessJwt": "fresh-access",
            "refreshJwt": "fresh-refresh"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/xrpc/com.atproto.repo.getRecord"))
        .and(header("authorization", "Bearer fresh-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uri": POST_URI,
            "value": {
                "$type": "app.bsky.feed.post",
                "text": "after renewal",
                "createdAt": "2024-05-01T12:00:00Z"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let manager = SessionManager::with_session(
        Arc::new(client.clone()),
        SessionConfig::default(),
        plume_core::Session::new(
            AccessToken::new("stale-access"),
            RefreshToken::new("stale-refresh"),
            plume_core::Did::new("did:plc:test123").unwrap(),
            plume_core::Handle::new("alice.test").unwrap(),
        ),
    );
    let uri = AtUri::new(POST_URI).unwrap();

    let auth = manager.current_auth_header();
    let err = client.get_record(&uri, auth.as_deref()).await.unwrap_err();
    assert!(err.is_auth_error());

    manager.on_unauthorized().unwrap().await.unwrap();

    let auth = manager.current_auth_header();
    assert_eq!(auth.as_deref(), Some("Bearer fresh-access"));
    let output = client.get_record(&uri, auth.as_deref()).await.unwrap();
    let Variant::Post(post) = output.value else {
        panic!("expected a post");
    };
    assert_eq!(post.text, "after renewal");
}
