//! Startup migration configuration types

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MIGRATION_LOCK_TTL_SECS, DEFAULT_MIGRATION_MAX_WAIT_SECS,
    DEFAULT_MIGRATION_POLL_INTERVAL_MS, DEFAULT_MIGRATION_TIMEOUT_SECS,
};
use pws_domain::constants::MIGRATION_LOCK_KEY;

/// Startup migration configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// Run the migration gate at startup
    pub enabled: bool,
    /// Lock key in the shared store
    pub lock_key: String,
    /// Lock TTL in seconds
    pub lock_ttl_secs: u64,
    /// Longest wait for another holder, in seconds
    pub max_wait_secs: u64,
    /// Poll interval while waiting, in milliseconds
    pub poll_interval_ms: u64,
    /// Migration command argv; no command means nothing to run
    pub command: Option<Vec<String>>,
    /// Bound on the migration command, in seconds
    pub timeout_secs: u64,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            lock_key: MIGRATION_LOCK_KEY.to_string(),
            lock_ttl_secs: DEFAULT_MIGRATION_LOCK_TTL_SECS,
            max_wait_secs: DEFAULT_MIGRATION_MAX_WAIT_SECS,
            poll_interval_ms: DEFAULT_MIGRATION_POLL_INTERVAL_MS,
            command: None,
            timeout_secs: DEFAULT_MIGRATION_TIMEOUT_SECS,
        }
    }
}

impl MigrationConfig {
    /// Lock TTL
    pub fn lock_ttl(&self) -> Duration {
        Duration::from_secs(self.lock_ttl_secs)
    }

    /// Wait bound
    pub fn max_wait(&self) -> Duration {
        Duration::from_secs(self.max_wait_secs)
    }

    /// Poll interval
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Command timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
