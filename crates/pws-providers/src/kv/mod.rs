//! Key-Value Store Implementations
//!
//! ## Available Providers
//!
//! | Provider | Type | Description |
//! |----------|------|-------------|
//! | [`InMemoryKeyValueStore`] | Local | DashMap-backed, single process |
//! | [`RedisKeyValueStore`] | Distributed | Redis-backed for multi-process deployments |

pub mod memory;
#[cfg(feature = "kv-redis")]
pub mod redis;

pub use memory::InMemoryKeyValueStore;
#[cfg(feature = "kv-redis")]
pub use redis::RedisKeyValueStore;
