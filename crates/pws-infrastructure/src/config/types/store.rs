//! Key-value store configuration types

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_STORE_NAMESPACE, DEFAULT_STORE_OPERATION_TIMEOUT_MS, DEFAULT_STORE_PROVIDER,
    DEFAULT_STORE_URL,
};

/// Shared key-value store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Registered provider name (`redis`, `memory`)
    pub provider: String,
    /// Connection URL
    pub url: String,
    /// Key namespace
    pub namespace: String,
    /// Bound on one store round-trip, in milliseconds
    pub operation_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_STORE_PROVIDER.to_string(),
            url: DEFAULT_STORE_URL.to_string(),
            namespace: DEFAULT_STORE_NAMESPACE.to_string(),
            operation_timeout_ms: DEFAULT_STORE_OPERATION_TIMEOUT_MS,
        }
    }
}

impl StoreConfig {
    /// Per-operation timeout
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }
}
