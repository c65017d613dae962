//! # Infrastructure Layer
//!
//! Cross-cutting technical concerns for the pad workspace session core.
//!
//! ### Configuration & Wiring
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | TOML + environment configuration via figment |
//! | [`di`] | Composition root building the application context |
//! | [`constants`] | Centralized configuration defaults |
//! | [`error_ext`] | Context helpers mapping foreign errors to the domain error |
//!
//! ### Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`health`] | Store connectivity checks |
//! | [`logging`] | Structured logging with tracing |

pub mod config;
pub mod constants;
pub mod di;
pub mod error_ext;
pub mod health;
pub mod logging;

pub use config::{AppConfig, ConfigLoader};
pub use di::{AppContext, AppContextBuilder, init_app};
pub use error_ext::ErrorContext;
