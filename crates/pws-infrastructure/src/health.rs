//! Health checks
//!
//! Reports store connectivity from a `PING` round-trip. The result backs
//! `GET /health` and the admin status page.

use std::sync::Arc;
use std::time::{Duration, Instant};

use pws_domain::ports::KeyValueStore;
use serde::{Deserialize, Serialize};

use crate::constants::HEALTH_CHECK_STORE;
use crate::logging::log_health_check;

/// Health status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Operational
    Up,
    /// Not operational
    Down,
}

impl HealthStatus {
    /// Check if the status indicates the service is healthy
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Up)
    }
}

/// Individual health check result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Name of the health check
    pub name: String,
    /// Current status
    pub status: HealthStatus,
    /// Time the check ran
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Response time in milliseconds
    pub response_time_ms: u64,
    /// Error message when down
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthCheck {
    /// Create a successful health check
    pub fn healthy<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            status: HealthStatus::Up,
            timestamp: chrono::Utc::now(),
            response_time_ms: 0,
            error: None,
        }
    }

    /// Create a failed health check
    pub fn failed<S: Into<String>>(name: S, error: Option<String>) -> Self {
        Self {
            name: name.into(),
            status: HealthStatus::Down,
            timestamp: chrono::Utc::now(),
            response_time_ms: 0,
            error,
        }
    }

    /// Set response time
    #[must_use]
    pub fn with_response_time(mut self, duration: Duration) -> Self {
        self.response_time_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }
}

/// Overall health report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `Up` only when every check is up
    pub status: HealthStatus,
    /// Individual results
    pub checks: Vec<HealthCheck>,
}

impl HealthResponse {
    /// Aggregate individual checks
    pub fn from_checks(checks: Vec<HealthCheck>) -> Self {
        let status = if checks.iter().all(|c| c.status.is_healthy()) {
            HealthStatus::Up
        } else {
            HealthStatus::Down
        };
        Self { status, checks }
    }
}

/// Runs the health checks against live dependencies
#[derive(Debug, Clone)]
pub struct HealthChecker {
    store: Arc<dyn KeyValueStore>,
}

impl HealthChecker {
    /// Create a checker over the shared store
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Ping the key-value store
    pub async fn check_store(&self) -> HealthCheck {
        let started = Instant::now();
        let check = match self.store.ping().await {
            Ok(()) => HealthCheck::healthy(HEALTH_CHECK_STORE),
            Err(e) => HealthCheck::failed(HEALTH_CHECK_STORE, Some(e.to_string())),
        };
        log_health_check(
            HEALTH_CHECK_STORE,
            check.status.is_healthy(),
            check.error.as_deref(),
        );
        check.with_response_time(started.elapsed())
    }

    /// Run every check
    pub async fn check(&self) -> HealthResponse {
        HealthResponse::from_checks(vec![self.check_store().await])
    }
}
