//! Provider registries
//!
//! Compile-time provider registration through linkme distributed slices.
//! Provider crates submit entries; the composition root resolves them by
//! the name given in configuration.

/// Key-value store backends
pub mod kv_store;

pub use kv_store::{
    KV_STORE_PROVIDERS, KvStoreProviderConfig, KvStoreProviderEntry, list_kv_store_providers,
    resolve_kv_store_provider,
};
