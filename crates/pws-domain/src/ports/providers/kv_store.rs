//! Key-Value Store Provider Port
//!
//! Thin async interface over the shared, network-accessible key-value store
//! that backs sessions and distributed locks. Every write carries a TTL and
//! the conditional operations are atomic on the store side, so multiple
//! processes can coordinate through it without sharing memory.
//!
//! ## Error contract
//!
//! An unreachable store or a timed-out round-trip is reported as
//! [`Error::UpstreamUnavailable`](crate::error::Error::UpstreamUnavailable),
//! never as an absent key.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// Shared key-value store with TTL and atomic conditional operations
///
/// Keys passed to the store are logical keys; implementations apply their
/// configured namespace prefix.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Read a value (`GET`)
    ///
    /// # Returns
    ///
    /// `None` when the key does not exist or has expired
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value with expiry (`SET key value EX ttl`)
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Write only when the key is absent (`SET key value NX EX ttl`)
    ///
    /// # Returns
    ///
    /// `true` when this call created the key
    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool>;

    /// Overwrite only when the key exists (`SET key value XX EX ttl`)
    ///
    /// # Returns
    ///
    /// `true` when an existing value was replaced
    async fn set_if_present(&self, key: &str, value: &str, ttl: Duration) -> Result<bool>;

    /// Delete a key (`DEL`)
    ///
    /// # Returns
    ///
    /// `true` when a key was removed
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Delete a key only while it still holds `expected` (compare-then-delete)
    ///
    /// # Returns
    ///
    /// `true` when the value matched and the key was removed
    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool>;

    /// Reset the TTL of `key` only if its current value equals `expected`
    ///
    /// # Returns
    ///
    /// `true` when the value matched and the new TTL was applied
    async fn expire_if_equals(&self, key: &str, expected: &str, ttl: Duration) -> Result<bool>;

    /// Check whether a key exists
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Plain connectivity check (`PING`)
    async fn ping(&self) -> Result<()>;

    /// Release connections; later calls may reconnect lazily
    async fn close(&self) -> Result<()>;

    /// Provider name for logs and status output
    fn provider_name(&self) -> &str;
}
