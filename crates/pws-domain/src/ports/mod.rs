//! Domain Port Interfaces
//!
//! Boundary contracts between the domain and the outer layers. High-level
//! services depend on these traits; providers and infrastructure implement
//! them.
//!
//! ## Organization
//!
//! - **infrastructure/** - Locking and migration services
//! - **providers/** - External collaborators (key-value store, identity
//!   provider, pad directory, workspace provisioning)

/// Infrastructure service ports
pub mod infrastructure;
/// External service provider ports
pub mod providers;

pub use infrastructure::{LockProvider, MigrationRunner};
pub use providers::{IdentityProvider, KeyValueStore, ResourceDirectory, WorkspaceProvisioner};
