//! Key-Value Store Provider Registry
//!
//! Auto-registration system for key-value store backends.
//! Providers register themselves into [`KV_STORE_PROVIDERS`] with
//! `#[linkme::distributed_slice]` and are discovered at runtime.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use pws_domain::ports::KeyValueStore;

/// Configuration for key-value store provider creation
///
/// Contains all configuration options that a backend might need.
/// Providers should use what they need and ignore the rest.
#[derive(Debug, Clone, Default)]
pub struct KvStoreProviderConfig {
    /// Provider name (e.g., "redis", "memory")
    pub provider: String,
    /// Connection URI (for networked stores)
    pub uri: Option<String>,
    /// Namespace prefix for keys
    pub namespace: Option<String>,
    /// Bound on every store round-trip
    pub operation_timeout: Option<Duration>,
    /// Additional provider-specific configuration
    pub extra: HashMap<String, String>,
}

impl KvStoreProviderConfig {
    /// Create a new config with the given provider name
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            ..Default::default()
        }
    }

    /// Set the URI
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Set the namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Set the per-operation timeout
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = Some(timeout);
        self
    }

    /// Add extra configuration
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Registry entry for key-value store providers
pub struct KvStoreProviderEntry {
    /// Unique provider name (e.g., "redis", "memory")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create provider instance
    pub factory: fn(&KvStoreProviderConfig) -> Result<Arc<dyn KeyValueStore>, String>,
}

#[linkme::distributed_slice]
pub static KV_STORE_PROVIDERS: [KvStoreProviderEntry] = [..];

/// Resolve a key-value store provider by name from the registry
///
/// # Arguments
/// * `config` - Configuration containing provider name and settings
///
/// # Returns
/// * `Ok(Arc<dyn KeyValueStore>)` - Created provider instance
/// * `Err(String)` - Error message if provider not found or creation failed
pub fn resolve_kv_store_provider(
    config: &KvStoreProviderConfig,
) -> Result<Arc<dyn KeyValueStore>, String> {
    if let Some(entry) = KV_STORE_PROVIDERS
        .iter()
        .find(|entry| entry.name == config.provider)
    {
        return (entry.factory)(config);
    }

    let available: Vec<&str> = KV_STORE_PROVIDERS.iter().map(|e| e.name).collect();
    Err(format!(
        "Unknown key-value store provider '{}'. Available providers: {:?}",
        config.provider, available
    ))
}

/// List all registered key-value store providers as `(name, description)`
pub fn list_kv_store_providers() -> Vec<(&'static str, &'static str)> {
    KV_STORE_PROVIDERS
        .iter()
        .map(|e| (e.name, e.description))
        .collect()
}
