//! Configuration types module

pub mod app;
pub mod logging;
pub mod migration;
pub mod oidc;
pub mod server;
pub mod session;
pub mod store;

// Re-export main types
pub use app::AppConfig;
pub use logging::LoggingConfig;
pub use migration::MigrationConfig;
pub use oidc::OidcConfig;
pub use server::ServerConfig;
pub use session::SessionConfig;
pub use store::StoreConfig;
