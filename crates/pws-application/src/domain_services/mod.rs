//! Domain services
//!
//! Stateful building blocks shared by the use cases: session persistence,
//! signing key cache and token lifecycle.

/// Signing key cache
pub mod jwks;
/// Session persistence
pub mod session_store;
/// Token verification and refresh
pub mod token_lifecycle;

pub use jwks::{JwksCache, KeyFamily};
pub use session_store::{SessionStore, redact_session_id};
pub use token_lifecycle::{RefreshOutcome, TokenLifecycleManager, TokenLifecycleSettings};
