//! In-memory key-value store provider
//!
//! Single-process store with the same TTL and conditional-write semantics
//! as the Redis provider. Used for development and tests, where several
//! "processes" can share one instance to exercise cross-process locking.
//! [`InMemoryKeyValueStore::force_expire`] simulates a TTL running out.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use pws_domain::error::Result;
use pws_domain::ports::KeyValueStore;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct MemoryEntry {
    value: String,
    expires_at: Instant,
}

impl MemoryEntry {
    fn new(value: &str, ttl: Duration) -> Self {
        Self {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_live(&self) -> bool {
        self.expires_at > Instant::now()
    }
}

/// In-memory key-value store
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: DashMap<String, MemoryEntry>,
    namespace: Option<String>,
}

impl InMemoryKeyValueStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix every key with `namespace:`
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into()).filter(|n| !n.is_empty());
        self
    }

    fn key(&self, key: &str) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}:{key}"),
            None => key.to_string(),
        }
    }

    /// Make `key` expire now, as if its TTL had elapsed
    ///
    /// # Returns
    ///
    /// `true` when a live key was expired
    pub fn force_expire(&self, key: &str) -> bool {
        match self.entries.get_mut(&self.key(key)) {
            Some(mut entry) if entry.is_live() => {
                entry.expires_at = Instant::now();
                true
            }
            _ => false,
        }
    }

    /// Remaining TTL of a live key
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        self.entries
            .get(&self.key(key))
            .filter(|entry| entry.is_live())
            .map(|entry| entry.expires_at.saturating_duration_since(Instant::now()))
    }

    /// Drop every expired entry
    ///
    /// # Returns
    ///
    /// Number of entries removed
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live());
        before.saturating_sub(self.entries.len())
    }

    /// Number of stored entries, including expired ones not yet purged
    pub fn stored_entries(&self) -> usize {
        self.entries.len()
    }

    /// Remove `key` if its entry has expired
    fn purge_if_expired(&self, key: &str) {
        self.entries.remove_if(key, |_, entry| !entry.is_live());
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.value().is_live()).count()
    }

    /// Whether no live key exists
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = self.key(key);
        let found = self
            .entries
            .get(&key)
            .map(|entry| entry.is_live().then(|| entry.value.clone()));
        match found {
            Some(None) => {
                self.purge_if_expired(&key);
                Ok(None)
            }
            Some(value) => Ok(value),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        self.entries.insert(self.key(key), MemoryEntry::new(value, ttl));
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        Ok(match self.entries.entry(self.key(key)) {
            Entry::Occupied(mut entry) => {
                if entry.get().is_live() {
                    false
                } else {
                    entry.insert(MemoryEntry::new(value, ttl));
                    true
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(MemoryEntry::new(value, ttl));
                true
            }
        })
    }

    async fn set_if_present(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        Ok(match self.entries.entry(self.key(key)) {
            Entry::Occupied(mut entry) => {
                if entry.get().is_live() {
                    entry.insert(MemoryEntry::new(value, ttl));
                    true
                } else {
                    entry.remove();
                    false
                }
            }
            Entry::Vacant(_) => false,
        })
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self
            .entries
            .remove(&self.key(key))
            .is_some_and(|(_, entry)| entry.is_live()))
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool> {
        Ok(self
            .entries
            .remove_if(&self.key(key), |_, entry| {
                entry.is_live() && entry.value == expected
            })
            .is_some())
    }

    async fn expire_if_equals(&self, key: &str, expected: &str, ttl: Duration) -> Result<bool> {
        let key = self.key(key);
        let renewed = match self.entries.get_mut(&key) {
            Some(mut entry) if entry.is_live() => {
                if entry.value == expected {
                    entry.expires_at = Instant::now() + ttl;
                }
                entry.value == expected
            }
            Some(_) => false,
            None => return Ok(false),
        };
        if !renewed {
            self.purge_if_expired(&key);
        }
        Ok(renewed)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let key = self.key(key);
        let live = self.entries.get(&key).map(|entry| entry.is_live());
        if live == Some(false) {
            self.purge_if_expired(&key);
        }
        Ok(live.unwrap_or(false))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }

    fn provider_name(&self) -> &str {
        "memory"
    }
}

// ============================================================================
// Auto-registration via linkme distributed slice
// ============================================================================

use pws_application::ports::registry::{
    KV_STORE_PROVIDERS, KvStoreProviderConfig, KvStoreProviderEntry,
};

/// Factory function for creating in-memory key-value store instances.
fn memory_kv_factory(
    config: &KvStoreProviderConfig,
) -> std::result::Result<Arc<dyn KeyValueStore>, String> {
    let mut store = InMemoryKeyValueStore::new();
    if let Some(namespace) = &config.namespace {
        store = store.with_namespace(namespace.clone());
    }
    Ok(Arc::new(store))
}

#[linkme::distributed_slice(KV_STORE_PROVIDERS)]
static MEMORY_PROVIDER: KvStoreProviderEntry = KvStoreProviderEntry {
    name: "memory",
    description: "In-process key-value store (single process only)",
    factory: memory_kv_factory,
};
