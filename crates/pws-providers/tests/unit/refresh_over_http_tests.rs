//! Session refresh against a mock token endpoint

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use mockito::{Server, ServerGuard};
use pws_application::{
    RefreshOutcome, SessionStore, TokenLifecycleManager, TokenLifecycleSettings,
};
use pws_domain::ports::KeyValueStore;
use pws_domain::value_objects::{ProviderMetadata, SessionRecord, TokenSet};
use pws_providers::kv::InMemoryKeyValueStore;
use pws_providers::lock::KeyValueLockProvider;
use pws_providers::oidc::{OidcClientConfig, OidcHttpClient};

struct Setup {
    sessions: Arc<SessionStore>,
    tokens: TokenLifecycleManager,
}

fn setup(server: &ServerGuard) -> Setup {
    let base = server.url();
    let config = OidcClientConfig::new(
        format!("{base}/.well-known/openid-configuration"),
        "pad-client",
        "http://app.test/auth/callback",
    )
    .with_timeout(Duration::from_secs(2));
    let metadata = ProviderMetadata {
        issuer: format!("{base}/realms/pad"),
        authorization_endpoint: format!("{base}/auth"),
        token_endpoint: format!("{base}/token"),
        end_session_endpoint: None,
        jwks_uri: format!("{base}/certs"),
        userinfo_endpoint: None,
    };
    let provider = Arc::new(OidcHttpClient::with_metadata(config, metadata).unwrap());

    let kv: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
    let sessions = Arc::new(SessionStore::new(kv.clone()));
    let locks = Arc::new(KeyValueLockProvider::new(kv));
    let tokens = TokenLifecycleManager::new(
        provider,
        sessions.clone(),
        locks,
        TokenLifecycleSettings::new("pad-client"),
    );
    Setup { sessions, tokens }
}

async fn seed(sessions: &SessionStore) -> SessionRecord {
    let tokens = TokenSet {
        access_token: "at-old".to_string(),
        token_type: Some("Bearer".to_string()),
        expires_in: Some(1),
        refresh_token: Some("rt-old".to_string()),
        refresh_expires_in: Some(1800),
        id_token: None,
        scope: None,
        extra: Default::default(),
    };
    let record = SessionRecord::from_token_set("sid-1", tokens, Utc::now());
    sessions
        .set("sid-1", &record, Duration::from_secs(1800))
        .await
        .unwrap();
    record
}

#[tokio::test]
async fn test_rate_limited_refresh_keeps_session() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/token")
        .with_status(429)
        .with_header("retry-after", "5")
        .create_async()
        .await;
    let s = setup(&server);
    let observed = seed(&s.sessions).await;

    let err = s.tokens.refresh("sid-1", &observed).await.unwrap_err();

    assert!(err.is_transient());
    assert_eq!(s.sessions.get("sid-1").await.unwrap(), Some(observed));
}

#[tokio::test]
async fn test_request_timeout_refresh_keeps_session() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/token")
        .with_status(408)
        .create_async()
        .await;
    let s = setup(&server);
    let observed = seed(&s.sessions).await;

    let err = s.tokens.refresh("sid-1", &observed).await.unwrap_err();

    assert!(err.is_transient());
    assert_eq!(s.sessions.get("sid-1").await.unwrap(), Some(observed));
}

#[tokio::test]
async fn test_invalid_grant_refresh_deletes_session() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/token")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"invalid_grant"}"#)
        .create_async()
        .await;
    let s = setup(&server);
    let observed = seed(&s.sessions).await;

    let outcome = s.tokens.refresh("sid-1", &observed).await.unwrap();

    assert_eq!(outcome, RefreshOutcome::Rejected);
    assert_eq!(s.sessions.get("sid-1").await.unwrap(), None);
}
