//! Domain Value Objects
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`SessionRecord`] | Server-side session persisted in the key-value store |
//! | [`Claims`] | Typed access token claims |
//! | [`Identity`] | Per-request view of the authenticated user |
//! | [`ResourceAccessDescriptor`] | Pad ownership and sharing |
//! | [`LockRecord`] | Held distributed lock with fencing token |
//! | [`TokenSet`] | Token endpoint response |
//! | [`ProviderMetadata`] | OIDC discovery document |

/// Claims and identity
pub mod identity;
/// Distributed lock record
pub mod lock;
/// OIDC wire types
pub mod oidc;
/// Resource ownership projection
pub mod resource;
/// Session record
pub mod session;

pub use identity::{Claims, Identity, RealmAccess};
pub use lock::LockRecord;
pub use oidc::{AuthorizationRequest, ProviderMetadata, TokenSet};
pub use resource::ResourceAccessDescriptor;
pub use session::SessionRecord;
