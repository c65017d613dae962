//! # Domain Layer
//!
//! Core types and contracts of the pad workspace session core: the error
//! taxonomy, the session and identity value objects, and the ports through
//! which the application layer reaches the key-value store, the identity
//! provider and the other external collaborators.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Error taxonomy and `Result` alias |
//! | [`value_objects`] | Sessions, claims, identities, locks, OIDC types |
//! | [`ports`] | Provider and infrastructure traits |
//! | [`crypto`] | Secure random token generation |
//! | [`constants`] | Domain constants |

/// Domain constants
pub mod constants;
/// Secure random tokens
pub mod crypto;
/// Error taxonomy
pub mod error;
/// Port traits
pub mod ports;
/// Value objects
pub mod value_objects;

pub use error::{Error, Result};
pub use value_objects::{
    Claims, Identity, LockRecord, ProviderMetadata, ResourceAccessDescriptor, SessionRecord,
    TokenSet,
};
