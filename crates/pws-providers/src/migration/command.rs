//! External command migration runner
//!
//! Runs a schema tool (for example `alembic upgrade head`) as a child
//! process. A non-zero exit status or a timeout is an error; the tail of
//! stderr is kept in the error message.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use pws_domain::error::{Error, Result};
use pws_domain::ports::MigrationRunner;
use tokio::process::Command;
use tracing::{debug, info};

use crate::constants::{DEFAULT_MIGRATION_COMMAND_TIMEOUT, MIGRATION_STDERR_TAIL_BYTES};

/// Runs a configured argv as the migration step
#[derive(Debug, Clone)]
pub struct CommandMigrationRunner {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandMigrationRunner {
    /// Build a runner from an argv list
    ///
    /// # Errors
    ///
    /// `Configuration` when `argv` is empty
    pub fn new(argv: &[String]) -> Result<Self> {
        let (program, args) = argv
            .split_first()
            .filter(|(program, _)| !program.trim().is_empty())
            .ok_or_else(|| Error::configuration("migration command must not be empty"))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            timeout: DEFAULT_MIGRATION_COMMAND_TIMEOUT,
        })
    }

    /// Bound the command's run time
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn stderr_tail(stderr: &[u8]) -> String {
        let start = stderr.len().saturating_sub(MIGRATION_STDERR_TAIL_BYTES);
        String::from_utf8_lossy(&stderr[start..]).trim().to_string()
    }
}

#[async_trait]
impl MigrationRunner for CommandMigrationRunner {
    async fn run_migrations(&self) -> Result<()> {
        debug!(program = %self.program, args = ?self.args, "Spawning migration command");
        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                Error::infrastructure_with_source(
                    format!("Failed to start migration command '{}'", self.program),
                    e,
                )
            })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                Error::infrastructure(format!(
                    "Migration command '{}' timed out after {:?}",
                    self.program, self.timeout
                ))
            })?
            .map_err(|e| Error::infrastructure_with_source("Migration command I/O failed", e))?;

        if !output.status.success() {
            return Err(Error::infrastructure(format!(
                "Migration command '{}' exited with {}: {}",
                self.program,
                output.status,
                Self::stderr_tail(&output.stderr)
            )));
        }

        info!(program = %self.program, "Migration command finished");
        Ok(())
    }

    fn name(&self) -> &str {
        "command"
    }
}
