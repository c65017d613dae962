//! Distributed Lock Provider Port
//!
//! Defines the contract for cross-process mutual exclusion. Locks expire on
//! their own after the TTL given at acquisition unless the holder extends
//! them. Release and extension are fenced: only the holder whose token is
//! still stored can touch the key.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::value_objects::LockRecord;

/// Distributed lock provider interface
#[async_trait]
pub trait LockProvider: Send + Sync {
    /// Try once to acquire `key` for `ttl`
    ///
    /// # Returns
    ///
    /// The held lock, or `None` when another holder has it
    async fn try_acquire(&self, key: &str, ttl: Duration) -> Result<Option<LockRecord>>;

    /// Release a held lock if this holder still owns it
    ///
    /// # Returns
    ///
    /// `false` when the lock had already expired or was taken over
    async fn release(&self, lock: &LockRecord) -> Result<bool>;

    /// Push the expiry of a held lock out by its TTL again
    ///
    /// # Returns
    ///
    /// `false` when this holder no longer owns the lock
    async fn extend(&self, lock: &LockRecord) -> Result<bool>;

    /// Whether any holder currently has `key`
    async fn is_held(&self, key: &str) -> Result<bool>;
}
