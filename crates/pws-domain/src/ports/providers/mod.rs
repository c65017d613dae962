//! External service provider ports

/// OIDC identity provider
pub mod identity;
/// Shared key-value store
pub mod kv_store;
/// Workspace provisioning service
pub mod provisioning;
/// Pad ownership lookup
pub mod resources;

pub use identity::IdentityProvider;
pub use kv_store::KeyValueStore;
pub use provisioning::WorkspaceProvisioner;
pub use resources::ResourceDirectory;
