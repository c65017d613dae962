//! # Pad Workspace Session
//!
//! Session and authentication coordination for the pad workspace backend:
//! opaque session cookies resolved to verified identities, OIDC tokens kept
//! fresh across concurrent requests and processes, pad-level authorization,
//! and a distributed lock that lets exactly one process run the startup
//! migration.
//!
//! ## Example
//!
//! ```ignore
//! use pws::infrastructure::{ConfigLoader, init_app};
//!
//! let config = ConfigLoader::new().load()?;
//! let context = init_app(config).await?;
//! let identity = context.auth().required(Some(session_id)).await?;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - error taxonomy, value objects, ports
//! - `application` - session store, token lifecycle, auth resolver, access guard, migration lock
//! - `providers` - Redis and in-memory stores, OIDC client, migration runners
//! - `infrastructure` - configuration, logging, health, composition root
//! - `server` - Rocket HTTP surface

/// Domain layer - error taxonomy, value objects and ports
pub mod domain {
    pub use pws_domain::*;
}

/// Application layer - session core services
pub mod application {
    pub use pws_application::*;
}

/// Provider implementations
pub mod providers {
    pub use pws_providers::*;
}

/// Infrastructure layer - configuration, logging and wiring
pub mod infrastructure {
    pub use pws_infrastructure::*;
}

/// Server layer - HTTP routes and startup
pub mod server {
    pub use pws_server::*;
}

// Re-export commonly used domain types at the crate root
pub use domain::{Error, Identity, Result, SessionRecord};

// Re-export main entry point at the crate root
pub use server::run_server;
