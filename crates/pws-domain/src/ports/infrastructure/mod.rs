//! Infrastructure service ports

/// Distributed locking
pub mod lock;
/// Schema migration
pub mod migration;

pub use lock::LockProvider;
pub use migration::MigrationRunner;
