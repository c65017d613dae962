//! Redis key-value store provider
//!
//! Shared store for multi-process deployments. Conditional writes use
//! `SET NX`/`SET XX` and the fenced delete and expire run as Lua scripts, so each
//! conditional operation is a single atomic round-trip.
//!
//! ## Example
//!
//! ```ignore
//! use pws_providers::kv::RedisKeyValueStore;
//!
//! let store = RedisKeyValueStore::new("redis://localhost:6379")?
//!     .with_namespace("pws")
//!     .with_operation_timeout(Duration::from_secs(2));
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pws_domain::error::{Error, Result};
use pws_domain::ports::KeyValueStore;
use redis::aio::ConnectionManager;
use redis::{Client, RedisResult, Script};
use tokio::sync::RwLock;
use tracing::debug;

use crate::constants::{DEFAULT_REDIS_URL, DEFAULT_STORE_OPERATION_TIMEOUT};

/// Deletes KEYS[1] only while it still holds ARGV[1]
const COMPARE_AND_DELETE: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
else
    return 0
end
"#;

/// Resets the TTL of KEYS[1] to ARGV[2] ms only while it still holds ARGV[1]
const COMPARE_AND_EXPIRE: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("PEXPIRE", KEYS[1], ARGV[2])
else
    return 0
end
"#;

/// Redis key-value store
///
/// Holds one lazily created [`ConnectionManager`], which multiplexes all
/// requests and reconnects on its own after a connection drop.
pub struct RedisKeyValueStore {
    client: Client,
    connection: RwLock<Option<ConnectionManager>>,
    compare_and_delete: Script,
    compare_and_expire: Script,
    namespace: Option<String>,
    operation_timeout: Duration,
}

impl RedisKeyValueStore {
    /// Create a store for the given connection URL
    ///
    /// No connection is opened until the first command.
    pub fn new(connection_string: &str) -> Result<Self> {
        let client = Client::open(connection_string).map_err(|e| {
            Error::configuration_with_source(format!("Invalid Redis URL: {e}"), e)
        })?;

        Ok(Self {
            client,
            connection: RwLock::new(None),
            compare_and_delete: Script::new(COMPARE_AND_DELETE),
            compare_and_expire: Script::new(COMPARE_AND_EXPIRE),
            namespace: None,
            operation_timeout: DEFAULT_STORE_OPERATION_TIMEOUT,
        })
    }

    /// Prefix every key with `namespace:`
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into()).filter(|n| !n.is_empty());
        self
    }

    /// Bound every round-trip, connection setup included
    #[must_use]
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    fn key(&self, key: &str) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}:{key}"),
            None => key.to_string(),
        }
    }

    async fn connection(&self) -> Result<ConnectionManager> {
        if let Some(conn) = self.connection.read().await.as_ref() {
            return Ok(conn.clone());
        }

        let mut slot = self.connection.write().await;
        if let Some(conn) = slot.as_ref() {
            return Ok(conn.clone());
        }
        let conn = self
            .bounded("CONNECT", self.client.get_connection_manager())
            .await?;
        debug!("Opened Redis connection");
        *slot = Some(conn.clone());
        Ok(conn)
    }

    async fn bounded<T, F>(&self, op: &str, fut: F) -> Result<T>
    where
        F: Future<Output = RedisResult<T>>,
    {
        match tokio::time::timeout(self.operation_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(Error::upstream_unavailable_with_source(
                format!("Redis {op} failed: {e}"),
                e,
            )),
            Err(_) => Err(Error::upstream_unavailable(format!(
                "Redis {op} timed out after {:?}",
                self.operation_timeout
            ))),
        }
    }

    fn ttl_millis(ttl: Duration) -> u64 {
        u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
    }
}

#[async_trait]
impl KeyValueStore for RedisKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection().await?;
        self.bounded(
            "GET",
            redis::cmd("GET").arg(self.key(key)).query_async(&mut conn),
        )
        .await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.connection().await?;
        self.bounded(
            "SET",
            redis::cmd("SET")
                .arg(self.key(key))
                .arg(value)
                .arg("PX")
                .arg(Self::ttl_millis(ttl))
                .query_async(&mut conn),
        )
        .await
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        let mut conn = self.connection().await?;
        let reply: Option<String> = self
            .bounded(
                "SET NX",
                redis::cmd("SET")
                    .arg(self.key(key))
                    .arg(value)
                    .arg("NX")
                    .arg("PX")
                    .arg(Self::ttl_millis(ttl))
                    .query_async(&mut conn),
            )
            .await?;
        Ok(reply.is_some())
    }

    async fn set_if_present(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        let mut conn = self.connection().await?;
        let reply: Option<String> = self
            .bounded(
                "SET XX",
                redis::cmd("SET")
                    .arg(self.key(key))
                    .arg(value)
                    .arg("XX")
                    .arg("PX")
                    .arg(Self::ttl_millis(ttl))
                    .query_async(&mut conn),
            )
            .await?;
        Ok(reply.is_some())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection().await?;
        let removed: i64 = self
            .bounded(
                "DEL",
                redis::cmd("DEL").arg(self.key(key)).query_async(&mut conn),
            )
            .await?;
        Ok(removed > 0)
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool> {
        let mut conn = self.connection().await?;
        let removed: i64 = self
            .bounded(
                "compare-and-delete",
                self.compare_and_delete
                    .key(self.key(key))
                    .arg(expected)
                    .invoke_async(&mut conn),
            )
            .await?;
        Ok(removed > 0)
    }

    async fn expire_if_equals(&self, key: &str, expected: &str, ttl: Duration) -> Result<bool> {
        let mut conn = self.connection().await?;
        let renewed: i64 = self
            .bounded(
                "compare-and-expire",
                self.compare_and_expire
                    .key(self.key(key))
                    .arg(expected)
                    .arg(Self::ttl_millis(ttl))
                    .invoke_async(&mut conn),
            )
            .await?;
        Ok(renewed > 0)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection().await?;
        let count: i64 = self
            .bounded(
                "EXISTS",
                redis::cmd("EXISTS").arg(self.key(key)).query_async(&mut conn),
            )
            .await?;
        Ok(count > 0)
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.connection().await?;
        let _: String = self
            .bounded("PING", redis::cmd("PING").query_async(&mut conn))
            .await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        if self.connection.write().await.take().is_some() {
            debug!("Closed Redis connection");
        }
        Ok(())
    }

    fn provider_name(&self) -> &str {
        "redis"
    }
}

impl std::fmt::Debug for RedisKeyValueStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisKeyValueStore")
            .field("namespace", &self.namespace)
            .field("operation_timeout", &self.operation_timeout)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Auto-registration via linkme distributed slice
// ============================================================================

use pws_application::ports::registry::{
    KV_STORE_PROVIDERS, KvStoreProviderConfig, KvStoreProviderEntry,
};

/// Factory function for creating Redis key-value store instances.
fn redis_kv_factory(
    config: &KvStoreProviderConfig,
) -> std::result::Result<Arc<dyn KeyValueStore>, String> {
    let uri = config.uri.as_deref().unwrap_or(DEFAULT_REDIS_URL);

    let mut store = RedisKeyValueStore::new(uri)
        .map_err(|e| format!("Failed to create Redis provider: {e}"))?;
    if let Some(namespace) = &config.namespace {
        store = store.with_namespace(namespace.clone());
    }
    if let Some(timeout) = config.operation_timeout {
        store = store.with_operation_timeout(timeout);
    }

    Ok(Arc::new(store))
}

#[linkme::distributed_slice(KV_STORE_PROVIDERS)]
static REDIS_PROVIDER: KvStoreProviderEntry = KvStoreProviderEntry {
    name: "redis",
    description: "Redis shared key-value store",
    factory: redis_kv_factory,
};
