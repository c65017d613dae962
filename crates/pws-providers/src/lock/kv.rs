//! Lock provider over the shared key-value store
//!
//! Acquisition is `SET NX` with the lock TTL and a fresh fencing token as
//! the value. Release is a compare-then-delete on that token, so a holder
//! whose lock expired and was re-acquired elsewhere cannot free the new
//! holder's lock. Extension resets the TTL under the same token check.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pws_domain::LockRecord;
use pws_domain::crypto::TokenGenerator;
use pws_domain::error::Result;
use pws_domain::ports::{KeyValueStore, LockProvider};
use tracing::debug;

/// Fenced distributed lock built on [`KeyValueStore`]
#[derive(Debug, Clone)]
pub struct KeyValueLockProvider {
    store: Arc<dyn KeyValueStore>,
}

impl KeyValueLockProvider {
    /// Create a lock provider over `store`
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl LockProvider for KeyValueLockProvider {
    async fn try_acquire(&self, key: &str, ttl: Duration) -> Result<Option<LockRecord>> {
        let holder_token = TokenGenerator::fencing_token();
        if self.store.set_if_absent(key, &holder_token, ttl).await? {
            debug!(lock_key = %key, ttl_ms = ttl.as_millis() as u64, "Lock acquired");
            Ok(Some(LockRecord {
                lock_key: key.to_string(),
                holder_token,
                ttl,
            }))
        } else {
            Ok(None)
        }
    }

    async fn release(&self, lock: &LockRecord) -> Result<bool> {
        let released = self
            .store
            .delete_if_equals(&lock.lock_key, &lock.holder_token)
            .await?;
        debug!(lock_key = %lock.lock_key, released, "Lock release");
        Ok(released)
    }

    async fn extend(&self, lock: &LockRecord) -> Result<bool> {
        let extended = self
            .store
            .expire_if_equals(&lock.lock_key, &lock.holder_token, lock.ttl)
            .await?;
        debug!(lock_key = %lock.lock_key, extended, "Lock extend");
        Ok(extended)
    }

    async fn is_held(&self, key: &str) -> Result<bool> {
        self.store.exists(key).await
    }
}
