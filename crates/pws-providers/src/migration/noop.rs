//! No-op migration runner

use async_trait::async_trait;
use pws_domain::error::Result;
use pws_domain::ports::MigrationRunner;

/// Runner for deployments without a migration command
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMigrationRunner;

#[async_trait]
impl MigrationRunner for NoopMigrationRunner {
    async fn run_migrations(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "noop"
    }
}
