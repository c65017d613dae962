//! # Pad Workspace Session Server
//!
//! HTTP surface of the session core, built on Rocket.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pws_server::run_server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // ./pws.toml, <config_dir>/pws/pws.toml, then PWS__* variables
//!     run_server(None).await
//! }
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`routes`] | Auth, user, pad, admin and health routes |
//! | [`guards`] | Request guards for the optional, required and admin tiers |
//! | [`error`] | Domain error to HTTP status mapping |
//! | [`cookies`] | Session and OAuth state cookies |
//! | [`init`] | Startup orchestration and the migration gate |

pub mod app;
pub mod catchers;
pub mod constants;
pub mod cookies;
pub mod error;
pub mod guards;
pub mod init;
pub mod routes;
pub mod state;

pub use app::build_rocket;
pub use error::ApiError;
pub use guards::{AdminUser, AuthenticatedUser, OptionalUser, SessionCookie};
pub use init::{check_store, migration_gate, run_server};
pub use state::ServerState;
