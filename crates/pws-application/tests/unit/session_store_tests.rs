//! Session persistence over the shared store

use std::time::Duration;

use pws_application::domain_services::redact_session_id;
use pws_domain::ports::KeyValueStore;

use crate::support::Harness;

#[tokio::test]
async fn test_set_get_delete() {
    let h = Harness::new();
    let record = h.seed("sid-1", "alice", 300).await;

    let loaded = h.sessions.get("sid-1").await.unwrap().unwrap();
    assert_eq!(loaded, record);
    assert!(h.store.exists("session:sid-1").await.unwrap());

    assert!(h.sessions.delete("sid-1").await.unwrap());
    assert_eq!(h.sessions.get("sid-1").await.unwrap(), None);
}

#[tokio::test]
async fn test_replace_does_not_resurrect() {
    let h = Harness::new();
    let record = h.seed("sid-1", "alice", 300).await;
    h.sessions.delete("sid-1").await.unwrap();

    let replaced = h
        .sessions
        .replace("sid-1", &record, Duration::from_secs(60))
        .await
        .unwrap();
    assert!(!replaced);
    assert_eq!(h.sessions.get("sid-1").await.unwrap(), None);
}

#[tokio::test]
async fn test_unreadable_record_is_discarded() {
    let h = Harness::new();
    h.store
        .set("session:sid-1", "{not json", Duration::from_secs(60))
        .await
        .unwrap();

    assert_eq!(h.sessions.get("sid-1").await.unwrap(), None);
    assert!(!h.store.exists("session:sid-1").await.unwrap());
}

#[tokio::test]
async fn test_store_ttl_expires_session() {
    let h = Harness::new();
    h.seed("sid-1", "alice", 300).await;

    h.store.force_expire("session:sid-1");
    assert_eq!(h.sessions.get("sid-1").await.unwrap(), None);
}

#[test]
fn test_redacted_session_id() {
    assert_eq!(redact_session_id("abcdefghijk"), "abcdef...");
    assert_eq!(redact_session_id("ab"), "ab...");
}
