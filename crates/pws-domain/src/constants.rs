//! Domain layer constants
//!
//! Contains constants that are part of the domain logic. Infrastructure
//! defaults (timeouts, ports, paths) live in `pws_infrastructure::constants`.

// ============================================================================
// SESSION DOMAIN CONSTANTS
// ============================================================================

/// Key prefix for session records in the key-value store
pub const SESSION_KEY_PREFIX: &str = "session:";

/// Key prefix for per-session refresh locks
pub const REFRESH_LOCK_KEY_PREFIX: &str = "refresh_lock:";

/// Name of the session cookie
pub const SESSION_COOKIE_NAME: &str = "session_id";

/// Lifetime assumed for an access token when the provider omits `expires_in`
pub const DEFAULT_EXPIRES_IN_SECS: u64 = 3600;

/// Number of random bytes in a session identifier (256 bits)
pub const SESSION_ID_BYTES: usize = 32;

/// Number of random bytes in a lock fencing token
pub const FENCING_TOKEN_BYTES: usize = 16;

// ============================================================================
// IDENTITY DOMAIN CONSTANTS
// ============================================================================

/// Role granting access to admin-only routes
pub const ADMIN_ROLE: &str = "admin";

// ============================================================================
// MIGRATION DOMAIN CONSTANTS
// ============================================================================

/// Default key of the startup migration lock
pub const MIGRATION_LOCK_KEY: &str = "migration_lock";
