//! # Pad Workspace Session - Provider Implementations
//!
//! Adapters for the ports defined in `pws-domain`. Key-value store
//! providers register themselves in the application-layer registry so the
//! composition root can select one by name from configuration.
//!
//! ## Provider Categories
//!
//! | Category | Port | Implementations |
//! |----------|------|-----------------|
//! | Key-value store | `KeyValueStore` | Redis, InMemory |
//! | Lock | `LockProvider` | KeyValue (fenced `SET NX`) |
//! | Identity | `IdentityProvider` | OIDC over HTTP |
//! | Resources | `ResourceDirectory` | InMemory |
//! | Provisioning | `WorkspaceProvisioner` | Null |
//! | Migration | `MigrationRunner` | Command, Noop |
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! pws-providers = { version = "0.1", default-features = false }
//! ```
//!
//! Without `kv-redis` only the in-memory store is registered.

pub use pws_domain::error::{Error, Result};
pub use pws_domain::ports::{
    IdentityProvider, KeyValueStore, LockProvider, MigrationRunner, ResourceDirectory,
    WorkspaceProvisioner,
};

/// Provider-specific constants
pub mod constants;

/// Key-value store provider implementations
///
/// Implements `KeyValueStore` and registers each backend by name.
pub mod kv;

/// Lock provider implementations
pub mod lock;

/// OIDC identity provider client
pub mod oidc;

/// Resource directory implementations
pub mod directory;

/// Workspace provisioning implementations
pub mod provisioning;

/// Migration runner implementations
pub mod migration;

pub use directory::InMemoryResourceDirectory;
pub use kv::InMemoryKeyValueStore;
#[cfg(feature = "kv-redis")]
pub use kv::RedisKeyValueStore;
pub use lock::KeyValueLockProvider;
pub use migration::{CommandMigrationRunner, NoopMigrationRunner};
pub use oidc::{OidcClientConfig, OidcHttpClient};
pub use provisioning::NullWorkspaceProvisioner;
