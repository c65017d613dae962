//! Fenced lock provider over the in-memory store

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use pws_domain::ports::LockProvider;
use pws_providers::kv::InMemoryKeyValueStore;
use pws_providers::lock::KeyValueLockProvider;

const TTL: Duration = Duration::from_secs(30);

fn providers() -> (Arc<InMemoryKeyValueStore>, KeyValueLockProvider) {
    let store = Arc::new(InMemoryKeyValueStore::new());
    let locks = KeyValueLockProvider::new(store.clone());
    (store, locks)
}

#[tokio::test]
async fn test_concurrent_acquire_has_one_winner() {
    let (_store, locks) = providers();

    let attempts = (0..10).map(|_| locks.try_acquire("migration_lock", TTL));
    let results = join_all(attempts).await;

    let winners = results
        .into_iter()
        .map(|r| r.unwrap())
        .filter(Option::is_some)
        .count();
    assert_eq!(winners, 1);
}

#[tokio::test]
async fn test_release_frees_the_key() {
    let (_store, locks) = providers();
    let lock = locks.try_acquire("k", TTL).await.unwrap().unwrap();

    assert!(locks.is_held("k").await.unwrap());
    assert!(locks.release(&lock).await.unwrap());
    assert!(!locks.is_held("k").await.unwrap());
    assert!(locks.try_acquire("k", TTL).await.unwrap().is_some());
}

#[tokio::test]
async fn test_stale_holder_cannot_release_new_lock() {
    let (store, locks) = providers();
    let stale = locks.try_acquire("k", TTL).await.unwrap().unwrap();

    assert!(store.force_expire("k"));
    let fresh = locks.try_acquire("k", TTL).await.unwrap().unwrap();
    assert_ne!(stale.holder_token, fresh.holder_token);

    assert!(!locks.release(&stale).await.unwrap());
    assert!(locks.is_held("k").await.unwrap());
    assert!(locks.release(&fresh).await.unwrap());
}

#[tokio::test]
async fn test_holder_can_extend_lock() {
    let (store, locks) = providers();
    let lock = locks
        .try_acquire("k", Duration::from_millis(50))
        .await
        .unwrap()
        .unwrap();
    let extended = pws_domain::LockRecord {
        ttl: TTL,
        ..lock.clone()
    };

    assert!(locks.extend(&extended).await.unwrap());
    assert!(store.ttl("k").is_some_and(|left| left > Duration::from_millis(50)));
    assert!(locks.release(&lock).await.unwrap());
}

#[tokio::test]
async fn test_stale_holder_cannot_extend_new_lock() {
    let (store, locks) = providers();
    let stale = locks.try_acquire("k", TTL).await.unwrap().unwrap();

    assert!(store.force_expire("k"));
    assert!(!locks.extend(&stale).await.unwrap());

    let fresh = locks.try_acquire("k", TTL).await.unwrap().unwrap();
    assert!(!locks.extend(&stale).await.unwrap());
    assert!(locks.extend(&fresh).await.unwrap());
}

#[tokio::test]
async fn test_lock_record_carries_ttl() {
    let (store, locks) = providers();
    let lock = locks.try_acquire("k", TTL).await.unwrap().unwrap();

    assert_eq!(lock.lock_key, "k");
    assert_eq!(lock.ttl, TTL);
    assert!(store.ttl("k").is_some_and(|left| left <= TTL));
}
