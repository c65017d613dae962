//! # Application Layer
//!
//! Orchestrates the domain ports into the session/authentication core.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`domain_services`] | Session store, JWKS cache, token lifecycle |
//! | [`use_cases`] | Auth resolver, access control guard, migration lock |
//! | [`ports::registry`] | linkme provider registry for key-value stores |

/// Stateful domain services
pub mod domain_services;
/// Application ports and registries
pub mod ports;
/// Use cases
pub mod use_cases;

pub use domain_services::{
    RefreshOutcome, SessionStore, TokenLifecycleManager, TokenLifecycleSettings,
};
pub use use_cases::{
    AccessControlGuard, AuthResolver, DistributedMigrationLock, MigrationLockSettings,
    MigrationOutcome, MigrationState, ResolvedSession,
};
