//! Main application configuration

use serde::{Deserialize, Serialize};

use super::{
    LoggingConfig, MigrationConfig, OidcConfig, ServerConfig, SessionConfig, StoreConfig,
};

/// Root configuration, one field per TOML section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server and cookies
    pub server: ServerConfig,
    /// Identity provider client
    pub oidc: OidcConfig,
    /// Session expiry and refresh coordination
    pub session: SessionConfig,
    /// Shared key-value store
    pub store: StoreConfig,
    /// Startup migration
    pub migration: MigrationConfig,
    /// Logging
    pub logging: LoggingConfig,
}
