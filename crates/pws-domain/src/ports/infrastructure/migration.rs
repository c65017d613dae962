//! Migration Runner Port
//!
//! Runs the schema migration tool. Migrations are assumed idempotent; the
//! tool itself is responsible for schema correctness.

use async_trait::async_trait;

use crate::error::Result;

/// Startup schema migration
#[async_trait]
pub trait MigrationRunner: Send + Sync {
    /// Apply pending migrations
    async fn run_migrations(&self) -> Result<()>;

    /// Runner name for logs
    fn name(&self) -> &str;
}
