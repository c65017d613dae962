//! Health check tests

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pws_domain::error::{Error, Result};
use pws_domain::ports::KeyValueStore;
use pws_infrastructure::constants::HEALTH_CHECK_STORE;
use pws_infrastructure::health::{HealthCheck, HealthChecker, HealthResponse, HealthStatus};
use pws_providers::InMemoryKeyValueStore;

/// Store whose every call fails as unreachable
#[derive(Debug)]
struct UnreachableStore;

#[async_trait]
impl KeyValueStore for UnreachableStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(Error::upstream_unavailable("connection refused"))
    }
    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<()> {
        Err(Error::upstream_unavailable("connection refused"))
    }
    async fn set_if_absent(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<bool> {
        Err(Error::upstream_unavailable("connection refused"))
    }
    async fn set_if_present(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<bool> {
        Err(Error::upstream_unavailable("connection refused"))
    }
    async fn delete(&self, _key: &str) -> Result<bool> {
        Err(Error::upstream_unavailable("connection refused"))
    }
    async fn delete_if_equals(&self, _key: &str, _expected: &str) -> Result<bool> {
        Err(Error::upstream_unavailable("connection refused"))
    }
    async fn expire_if_equals(
        &self,
        _key: &str,
        _expected: &str,
        _ttl: Duration,
    ) -> Result<bool> {
        Err(Error::upstream_unavailable("connection refused"))
    }
    async fn exists(&self, _key: &str) -> Result<bool> {
        Err(Error::upstream_unavailable("connection refused"))
    }
    async fn ping(&self) -> Result<()> {
        Err(Error::upstream_unavailable("connection refused"))
    }
    async fn close(&self) -> Result<()> {
        Ok(())
    }
    fn provider_name(&self) -> &str {
        "unreachable"
    }
}

#[tokio::test]
async fn test_memory_store_is_up() {
    let checker = HealthChecker::new(Arc::new(InMemoryKeyValueStore::new()));
    let report = checker.check().await;

    assert_eq!(report.status, HealthStatus::Up);
    assert_eq!(report.checks.len(), 1);
    assert_eq!(report.checks[0].name, HEALTH_CHECK_STORE);
    assert!(report.checks[0].error.is_none());
}

#[tokio::test]
async fn test_unreachable_store_is_down() {
    let checker = HealthChecker::new(Arc::new(UnreachableStore));
    let check = checker.check_store().await;

    assert_eq!(check.status, HealthStatus::Down);
    assert!(check.error.unwrap().contains("connection refused"));
}

#[test]
fn test_response_is_down_when_any_check_fails() {
    let report = HealthResponse::from_checks(vec![
        HealthCheck::healthy("a"),
        HealthCheck::failed("b", None),
    ]);
    assert_eq!(report.status, HealthStatus::Down);

    let report = HealthResponse::from_checks(vec![HealthCheck::healthy("a")]);
    assert!(report.status.is_healthy());
}

#[test]
fn test_status_serializes_lowercase() {
    let check = HealthCheck::healthy("store").with_response_time(Duration::from_millis(3));
    let json = serde_json::to_value(&check).unwrap();
    assert_eq!(json["status"], "up");
    assert_eq!(json["response_time_ms"], 3);
    assert!(json.get("error").is_none());
}
