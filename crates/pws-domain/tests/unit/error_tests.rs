//! Tests for error classification

use std::time::Duration;

use pws_domain::Error;

#[test]
fn test_transient_errors() {
    assert!(Error::upstream_unavailable("redis down").is_transient());
    assert!(Error::lock_timeout("migration_lock", Duration::from_secs(300)).is_transient());
    assert!(!Error::unauthenticated("no session").is_transient());
    assert!(!Error::forbidden("not owner").is_transient());
}

#[test]
fn test_authentication_failures() {
    assert!(Error::unauthenticated("no session").is_authentication_failure());
    assert!(Error::invalid_token("bad signature").is_authentication_failure());
    assert!(Error::TokenExpired.is_authentication_failure());
    assert!(!Error::upstream_unavailable("idp timeout").is_authentication_failure());
    assert!(!Error::not_found("pad").is_authentication_failure());
}

#[test]
fn test_kind_is_stable_and_generic() {
    let err = Error::infrastructure("Redis GET failed: connection refused on 10.0.0.3");
    assert_eq!(err.kind(), "infrastructure");
    assert!(!err.kind().contains("10.0.0.3"));
    assert_eq!(Error::not_found("pad 42").kind(), "not_found");
}

#[test]
fn test_lock_timeout_display() {
    let err = Error::lock_timeout("migration_lock", Duration::from_secs(5));
    assert_eq!(err.to_string(), "Lock timeout on 'migration_lock' after 5s");
}
