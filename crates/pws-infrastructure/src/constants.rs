//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.
//! Domain-specific constants are defined in `pws_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "pws.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "pws";

/// Environment variable prefix for configuration (`PWS__SECTION__KEY`)
pub const CONFIG_ENV_PREFIX: &str = "PWS";

/// Separator between nested keys in environment variables
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// HTTP SERVER CONSTANTS
// ============================================================================

/// Default bind address
pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";

/// Default HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 8000;

/// Default frontend URL for post-login and post-logout redirects
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";

// ============================================================================
// OIDC CONSTANTS
// ============================================================================

/// Default scopes requested at login
pub const DEFAULT_OIDC_SCOPES: &[&str] = &["openid", "profile", "email"];

/// Default identity provider HTTP timeout in seconds
pub const DEFAULT_OIDC_HTTP_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// SESSION CONSTANTS
// ============================================================================

/// Window before expiry in which a token is already refreshed
pub const DEFAULT_EXPIRY_MARGIN_SECS: u64 = 30;

/// TTL of the per-session refresh lock, longer than the OIDC HTTP timeout
pub const DEFAULT_REFRESH_LOCK_TTL_SECS: u64 = 15;

/// How long a request waits for a concurrent refresh
pub const DEFAULT_REFRESH_WAIT_MS: u64 = 5000;

/// Poll interval while waiting for a concurrent refresh
pub const DEFAULT_REFRESH_POLL_MS: u64 = 100;

// ============================================================================
// STORE CONSTANTS
// ============================================================================

/// Default key-value store provider
pub const DEFAULT_STORE_PROVIDER: &str = "redis";

/// Default Redis URL
pub const DEFAULT_STORE_URL: &str = "redis://127.0.0.1:6379";

/// Default key namespace
pub const DEFAULT_STORE_NAMESPACE: &str = "pws";

/// Default bound on a single store round-trip
pub const DEFAULT_STORE_OPERATION_TIMEOUT_MS: u64 = 2000;

// ============================================================================
// MIGRATION CONSTANTS
// ============================================================================

/// Default migration lock TTL
pub const DEFAULT_MIGRATION_LOCK_TTL_SECS: u64 = 120;

/// Default longest wait for another migration holder
pub const DEFAULT_MIGRATION_MAX_WAIT_SECS: u64 = 300;

/// Default poll interval while waiting for the migration lock
pub const DEFAULT_MIGRATION_POLL_INTERVAL_MS: u64 = 1000;

/// Default bound on the migration command
pub const DEFAULT_MIGRATION_TIMEOUT_SECS: u64 = 600;

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_FILTER_ENV: &str = "PWS_LOG";

/// File name prefix of rolling log files
pub const LOG_FILE_PREFIX: &str = "pws";

// ============================================================================
// HEALTH CONSTANTS
// ============================================================================

/// Name of the key-value store health check
pub const HEALTH_CHECK_STORE: &str = "store";
