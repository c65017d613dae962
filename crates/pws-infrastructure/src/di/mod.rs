//! Composition root
//!
//! Wiring only: every service is constructed here from configuration and
//! handed out as `Arc<dyn Trait>` or `Arc<Service>`. Provider implementations
//! live in `pws-providers`; business logic lives in `pws-application`.
//!
//! ```text
//! AppContextBuilder
//! ├── providers  (store, identity, directory, provisioner, runner)
//! └── services   (sessions, tokens, auth, access, migration lock, health)
//! ```

pub mod bootstrap;

pub use bootstrap::*;
