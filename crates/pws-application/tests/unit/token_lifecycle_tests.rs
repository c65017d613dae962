//! Verification and refresh coordination

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use jsonwebtoken::Algorithm;
use pws_application::RefreshOutcome;
use pws_application::domain_services::KeyFamily;
use pws_domain::Error;
use pws_domain::ports::{KeyValueStore, LockProvider};
use pws_providers::lock::KeyValueLockProvider;
use serde_json::json;

use crate::support::{AUDIENCE, FakeIdentityProvider, Harness, ISSUER, KID, fast_settings};

#[tokio::test]
async fn test_verify_valid_token() {
    let h = Harness::new();
    let token = h.idp.access_token("alice", 300, &["admin"]);

    let claims = h.tokens.verify(&token).await.unwrap();
    assert_eq!(claims.sub, "alice");
    assert_eq!(claims.preferred_username, "alice");
    assert_eq!(claims.realm_access.roles, vec!["admin".to_string()]);
    assert!(!claims.email_verified);
    assert_eq!(claims.name, "");
}

#[tokio::test]
async fn test_verify_expired_token() {
    let h = Harness::new();
    let token = h.idp.access_token("alice", -120, &[]);

    let err = h.tokens.verify(&token).await.unwrap_err();
    assert!(matches!(err, Error::TokenExpired));
}

#[tokio::test]
async fn test_verify_rejects_other_audience() {
    let h = Harness::new();
    let exp = Utc::now().timestamp() + 300;
    let token = h.idp.sign(
        KID,
        json!({ "sub": "alice", "iss": ISSUER, "aud": "someone-else", "exp": exp }),
    );

    let err = h.tokens.verify(&token).await.unwrap_err();
    assert!(matches!(err, Error::InvalidToken { .. }));
}

#[tokio::test]
async fn test_verify_rejects_other_issuer() {
    let h = Harness::new();
    let exp = Utc::now().timestamp() + 300;
    let token = h.idp.sign(
        KID,
        json!({ "sub": "alice", "iss": "https://evil.test", "aud": AUDIENCE, "exp": exp }),
    );

    let err = h.tokens.verify(&token).await.unwrap_err();
    assert!(matches!(err, Error::InvalidToken { .. }));
}

#[tokio::test]
async fn test_verify_rejects_garbage() {
    let h = Harness::new();
    let err = h.tokens.verify("not-a-jwt").await.unwrap_err();
    assert!(matches!(err, Error::InvalidToken { .. }));
}

#[tokio::test]
async fn test_unknown_kid_refetches_once() {
    let h = Harness::new();
    h.tokens
        .verify(&h.idp.access_token("alice", 300, &[]))
        .await
        .unwrap();
    assert_eq!(h.idp.jwks_calls(), 1);

    let exp = Utc::now().timestamp() + 300;
    let rotated = h.idp.sign(
        "rotated",
        json!({ "sub": "alice", "iss": ISSUER, "aud": AUDIENCE, "exp": exp }),
    );
    let err = h.tokens.verify(&rotated).await.unwrap_err();
    assert!(matches!(err, Error::InvalidToken { .. }));
    assert_eq!(h.idp.jwks_calls(), 2);

    h.idp.publish_kid("rotated");
    h.tokens.verify(&rotated).await.unwrap();
    assert_eq!(h.idp.jwks_calls(), 3);

    h.tokens.verify(&rotated).await.unwrap();
    assert_eq!(h.idp.jwks_calls(), 3);
}

#[test]
fn test_key_family_of_algorithm() {
    assert_eq!(KeyFamily::of_algorithm(Algorithm::HS256), Some(KeyFamily::Symmetric));
    assert_eq!(KeyFamily::of_algorithm(Algorithm::RS256), Some(KeyFamily::Rsa));
    assert_eq!(KeyFamily::of_algorithm(Algorithm::PS384), Some(KeyFamily::Rsa));
    assert_eq!(KeyFamily::of_algorithm(Algorithm::ES256), Some(KeyFamily::Ec));
    assert_eq!(KeyFamily::of_algorithm(Algorithm::EdDSA), Some(KeyFamily::Okp));
}

#[tokio::test]
async fn test_is_expired_honours_margin() {
    let h = Harness::new();
    let fresh = h.seed("sid-fresh", "alice", 300).await;
    let closing = h.seed("sid-closing", "alice", 10).await;

    assert!(!h.tokens.is_expired(&fresh));
    assert!(h.tokens.is_expired(&closing));
}

#[tokio::test]
async fn test_refresh_replaces_tokens() {
    let h = Harness::new();
    let observed = h.seed("sid-1", "alice", -5).await;

    let outcome = h.tokens.refresh("sid-1", &observed).await.unwrap();
    let next = outcome.into_record().unwrap();

    assert_ne!(next.access_token, observed.access_token);
    assert_eq!(next.refresh_token.as_deref(), Some("rt-alice"));
    assert!(next.expires_at > Utc::now());
    assert_eq!(h.sessions.get("sid-1").await.unwrap(), Some(next));
    assert_eq!(h.idp.refresh_calls(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_refresh_calls_provider_once() {
    let h = Harness::new();
    let observed = h.seed("sid-1", "alice", -5).await;

    let attempts = (0..10).map(|_| {
        let tokens = Arc::clone(&h.tokens);
        let observed = observed.clone();
        tokio::spawn(async move { tokens.refresh("sid-1", &observed).await })
    });
    let outcomes: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    assert_eq!(h.idp.refresh_calls(), 1);
    let stored = h.sessions.get("sid-1").await.unwrap().unwrap();
    for outcome in outcomes {
        assert_eq!(outcome, RefreshOutcome::Refreshed(stored.clone()));
    }
}

#[tokio::test]
async fn test_stale_observation_skips_provider() {
    let h = Harness::new();
    let stale = h.seed("sid-1", "alice", -5).await;
    h.seed("sid-1", "alice", 300).await;

    let outcome = h.tokens.refresh("sid-1", &stale).await.unwrap();
    assert!(outcome.success());
    assert_eq!(h.idp.refresh_calls(), 0);
}

#[tokio::test]
async fn test_rejected_refresh_deletes_session() {
    let h = Harness::new();
    let observed = h.seed("sid-1", "alice", -5).await;
    h.idp.revoke_refresh_tokens();

    let outcome = h.tokens.refresh("sid-1", &observed).await.unwrap();
    assert_eq!(outcome, RefreshOutcome::Rejected);
    assert_eq!(h.sessions.get("sid-1").await.unwrap(), None);
}

#[tokio::test]
async fn test_provider_outage_keeps_session() {
    let h = Harness::new();
    let observed = h.seed("sid-1", "alice", -5).await;
    h.idp.go_down();

    let err = h.tokens.refresh("sid-1", &observed).await.unwrap_err();
    assert!(err.is_transient());
    assert_eq!(h.sessions.get("sid-1").await.unwrap(), Some(observed));
    assert!(!h.store.exists("refresh_lock:sid-1").await.unwrap());
}

#[tokio::test]
async fn test_refresh_of_missing_session_is_rejected() {
    let h = Harness::new();
    let observed = h.seed("sid-1", "alice", -5).await;
    h.sessions.delete("sid-1").await.unwrap();

    let outcome = h.tokens.refresh("sid-1", &observed).await.unwrap();
    assert_eq!(outcome, RefreshOutcome::Rejected);
    assert_eq!(h.idp.refresh_calls(), 0);
}

#[tokio::test]
async fn test_waiter_gives_up_after_bound() {
    let mut settings = fast_settings();
    settings.refresh_wait = Duration::from_millis(100);
    let h = Harness::with(FakeIdentityProvider::new(), settings);
    let observed = h.seed("sid-1", "alice", -5).await;

    let locks = KeyValueLockProvider::new(h.store.clone());
    let _held = locks
        .try_acquire("refresh_lock:sid-1", Duration::from_secs(30))
        .await
        .unwrap()
        .unwrap();

    let err = h.tokens.refresh("sid-1", &observed).await.unwrap_err();
    assert!(matches!(err, Error::UpstreamUnavailable { .. }));
    assert_eq!(h.idp.refresh_calls(), 0);
    assert!(h.sessions.get("sid-1").await.unwrap().is_some());
}

#[tokio::test]
async fn test_waiter_sees_logout() {
    let h = Harness::new();
    let observed = h.seed("sid-1", "alice", -5).await;

    let locks = KeyValueLockProvider::new(h.store.clone());
    let _held = locks
        .try_acquire("refresh_lock:sid-1", Duration::from_secs(30))
        .await
        .unwrap()
        .unwrap();
    h.sessions.delete("sid-1").await.unwrap();

    let outcome = h.tokens.refresh("sid-1", &observed).await.unwrap();
    assert_eq!(outcome, RefreshOutcome::Rejected);
}
