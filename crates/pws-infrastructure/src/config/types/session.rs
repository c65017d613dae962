//! Session configuration types

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_EXPIRY_MARGIN_SECS, DEFAULT_REFRESH_LOCK_TTL_SECS, DEFAULT_REFRESH_POLL_MS,
    DEFAULT_REFRESH_WAIT_MS,
};
use pws_domain::constants::DEFAULT_EXPIRES_IN_SECS;

/// Session expiry and refresh coordination
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Tokens this close to expiry are refreshed
    pub expiry_margin_secs: u64,
    /// TTL of the per-session refresh lock
    pub refresh_lock_ttl_secs: u64,
    /// How long a request waits for a concurrent refresh, in milliseconds
    pub refresh_wait_ms: u64,
    /// Poll interval while waiting, in milliseconds
    pub refresh_poll_ms: u64,
    /// Access token lifetime assumed when the provider omits `expires_in`
    pub default_expires_in_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            expiry_margin_secs: DEFAULT_EXPIRY_MARGIN_SECS,
            refresh_lock_ttl_secs: DEFAULT_REFRESH_LOCK_TTL_SECS,
            refresh_wait_ms: DEFAULT_REFRESH_WAIT_MS,
            refresh_poll_ms: DEFAULT_REFRESH_POLL_MS,
            default_expires_in_secs: DEFAULT_EXPIRES_IN_SECS,
        }
    }
}

impl SessionConfig {
    /// Expiry margin
    pub fn expiry_margin(&self) -> Duration {
        Duration::from_secs(self.expiry_margin_secs)
    }

    /// Refresh lock TTL
    pub fn refresh_lock_ttl(&self) -> Duration {
        Duration::from_secs(self.refresh_lock_ttl_secs)
    }

    /// Refresh wait bound
    pub fn refresh_wait(&self) -> Duration {
        Duration::from_millis(self.refresh_wait_ms)
    }

    /// Refresh poll interval
    pub fn refresh_poll(&self) -> Duration {
        Duration::from_millis(self.refresh_poll_ms)
    }
}
