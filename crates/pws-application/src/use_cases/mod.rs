//! Use cases
//!
//! Request-facing orchestration (authentication tiers, pad authorization)
//! and the startup migration gate.

/// Pad authorization
pub mod access_control;
/// Session to identity pipeline
pub mod auth_resolver;
/// Startup migration gate
pub mod migration_lock;

pub use access_control::AccessControlGuard;
pub use auth_resolver::{AuthResolver, ResolvedSession};
pub use migration_lock::{
    DistributedMigrationLock, MigrationLockSettings, MigrationOutcome, MigrationState,
};
