//! Startup migration gate across processes sharing one store

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use pws_application::{
    DistributedMigrationLock, MigrationLockSettings, MigrationOutcome, MigrationState,
};
use pws_domain::error::{Error, Result};
use pws_domain::ports::{LockProvider, MigrationRunner};
use pws_providers::kv::InMemoryKeyValueStore;
use pws_providers::lock::KeyValueLockProvider;

struct CountingRunner {
    runs: AtomicUsize,
    duration: Duration,
    fail: bool,
}

impl CountingRunner {
    fn new(duration: Duration) -> Self {
        Self {
            runs: AtomicUsize::new(0),
            duration,
            fail: false,
        }
    }
}

#[async_trait]
impl MigrationRunner for CountingRunner {
    async fn run_migrations(&self) -> Result<()> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.duration).await;
        if self.fail {
            Err(Error::infrastructure("schema tool exited with 1"))
        } else {
            Ok(())
        }
    }

    fn name(&self) -> &str {
        "counting"
    }
}

fn settings() -> MigrationLockSettings {
    MigrationLockSettings {
        poll_interval: Duration::from_millis(20),
        max_wait: Duration::from_secs(5),
        ..Default::default()
    }
}

fn shared_locks() -> Arc<KeyValueLockProvider> {
    Arc::new(KeyValueLockProvider::new(Arc::new(InMemoryKeyValueStore::new())))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_two_processes_migrate_once() {
    let locks = shared_locks();
    let first = DistributedMigrationLock::new(locks.clone(), settings());
    let second = DistributedMigrationLock::new(locks.clone(), settings());
    let runner = CountingRunner::new(Duration::from_millis(200));

    let (a, b) = tokio::join!(first.run(&runner), second.run(&runner));

    assert_eq!(runner.runs.load(Ordering::SeqCst), 1);
    let mut outcomes = vec![a, b];
    outcomes.sort_by_key(|o| format!("{o:?}"));
    assert_eq!(
        outcomes,
        vec![MigrationOutcome::AlreadyMigrated, MigrationOutcome::Migrated]
    );
    assert_eq!(first.state(), MigrationState::Done);
    assert_eq!(second.state(), MigrationState::Done);
    assert!(!locks.is_held("migration_lock").await.unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_holder_keeps_lock_while_migration_outlasts_ttl() {
    let locks = shared_locks();
    let short_ttl = MigrationLockSettings {
        lock_ttl: Duration::from_millis(90),
        ..settings()
    };
    let first = DistributedMigrationLock::new(locks.clone(), short_ttl.clone());
    let late = DistributedMigrationLock::new(locks.clone(), short_ttl);
    let runner = CountingRunner::new(Duration::from_millis(400));

    let (a, b) = tokio::join!(first.run(&runner), async {
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(locks.is_held("migration_lock").await.unwrap());
        late.run(&runner).await
    });

    assert_eq!(a, MigrationOutcome::Migrated);
    assert_eq!(b, MigrationOutcome::AlreadyMigrated);
    assert_eq!(runner.runs.load(Ordering::SeqCst), 1);
    assert!(!locks.is_held("migration_lock").await.unwrap());
}

#[tokio::test]
async fn test_held_lock_degrades_after_max_wait() {
    let locks = shared_locks();
    let _stuck = locks
        .try_acquire("migration_lock", Duration::from_secs(60))
        .await
        .unwrap()
        .unwrap();
    let gate = DistributedMigrationLock::new(
        locks.clone(),
        MigrationLockSettings {
            max_wait: Duration::from_millis(100),
            ..settings()
        },
    );
    let runner = CountingRunner::new(Duration::ZERO);

    assert_eq!(gate.run(&runner).await, MigrationOutcome::Degraded);
    assert_eq!(runner.runs.load(Ordering::SeqCst), 0);
    assert_eq!(gate.state(), MigrationState::Done);
}

#[tokio::test]
async fn test_failed_migration_releases_lock() {
    let locks = shared_locks();
    let gate = DistributedMigrationLock::new(locks.clone(), settings());
    let runner = CountingRunner {
        fail: true,
        ..CountingRunner::new(Duration::ZERO)
    };

    let outcome = gate.run(&runner).await;
    assert!(matches!(outcome, MigrationOutcome::Failed { .. }));
    assert!(!locks.is_held("migration_lock").await.unwrap());
}

#[tokio::test]
async fn test_state_transitions_are_observable() {
    let gate = DistributedMigrationLock::new(shared_locks(), settings());
    let mut states = gate.subscribe();
    assert_eq!(*states.borrow_and_update(), MigrationState::Idle);

    gate.run(&CountingRunner::new(Duration::ZERO)).await;

    assert!(states.has_changed().unwrap());
    assert_eq!(*states.borrow_and_update(), MigrationState::Done);
}

#[test]
fn test_outcome_serializes_with_tag() {
    let json = serde_json::to_value(MigrationOutcome::Failed {
        message: "boom".to_string(),
    })
    .unwrap();
    assert_eq!(json["outcome"], "failed");
    assert_eq!(json["message"], "boom");
}
