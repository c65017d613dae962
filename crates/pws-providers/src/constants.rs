//! Provider-specific constants

use std::time::Duration;

// ============================================================================
// KEY-VALUE STORE CONSTANTS
// ============================================================================

/// Redis URL used when none is configured
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Bound on a single store round-trip
pub const DEFAULT_STORE_OPERATION_TIMEOUT: Duration = Duration::from_secs(2);

// ============================================================================
// OIDC CONSTANTS
// ============================================================================

/// Bound on identity provider HTTP calls
pub const DEFAULT_OIDC_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Scopes requested at login
pub const DEFAULT_OIDC_SCOPES: &[&str] = &["openid", "profile", "email"];

// ============================================================================
// MIGRATION CONSTANTS
// ============================================================================

/// Bound on an external migration command
pub const DEFAULT_MIGRATION_COMMAND_TIMEOUT: Duration = Duration::from_secs(600);

/// Bytes of migration stderr kept in error messages
pub const MIGRATION_STDERR_TAIL_BYTES: usize = 2048;
