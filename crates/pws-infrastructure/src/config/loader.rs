//! Configuration loader
//!
//! Handles loading configuration from TOML files, environment variables,
//! and default values using Figment.

use std::env;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use pws_domain::error::{Error, Result};

use crate::config::AppConfig;
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME,
};
use crate::error_ext::ErrorContext;
use crate::logging::log_config_loaded;

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    #[must_use]
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    #[must_use]
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Merged configuration sources, without extraction or validation
    ///
    /// Sources are merged in this order (later sources override earlier):
    /// 1. Default values from `AppConfig::default()`
    /// 2. TOML configuration file (explicit path, or the first default location found)
    /// 3. Environment variables, e.g. `PWS__OIDC__CLIENT_ID`
    pub fn figment(&self) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        match &self.config_path {
            Some(path) if path.exists() => {
                figment = figment.merge(Toml::file(path));
                log_config_loaded(path, true);
            }
            Some(path) => log_config_loaded(path, false),
            None => {
                if let Some(path) = Self::find_default_config_path() {
                    figment = figment.merge(Toml::file(&path));
                    log_config_loaded(&path, true);
                }
            }
        }

        figment.merge(
            Env::prefixed(&format!("{}{CONFIG_ENV_SEPARATOR}", self.env_prefix))
                .split(CONFIG_ENV_SEPARATOR),
        )
    }

    /// Load and validate configuration from all sources
    pub fn load(&self) -> Result<AppConfig> {
        let config: AppConfig = self
            .figment()
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_app_config(&config)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).config_context("Failed to serialize config to TOML")?;

        let path = path.as_ref();
        std::fs::write(path, toml_string)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;

        Ok(())
    }

    /// Get the configured file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Find the first existing default configuration file
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = [
            Some(current_dir.join(DEFAULT_CONFIG_FILENAME)),
            dirs::config_dir().map(|d| d.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME)),
        ];

        candidates.into_iter().flatten().find(|path| path.exists())
    }
}

/// Validate application configuration
///
/// Rejects configurations the server cannot start with.
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    validate_oidc_config(config)?;
    validate_store_config(config)?;
    validate_session_config(config)?;
    validate_migration_config(config)?;
    Ok(())
}

fn required(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::configuration(format!("{name} is required")))
    } else {
        Ok(())
    }
}

fn validate_oidc_config(config: &AppConfig) -> Result<()> {
    required(&config.oidc.discovery_url, "oidc.discovery_url")?;
    required(&config.oidc.client_id, "oidc.client_id")?;
    required(&config.oidc.redirect_uri, "oidc.redirect_uri")?;
    Ok(())
}

fn validate_store_config(config: &AppConfig) -> Result<()> {
    required(&config.store.provider, "store.provider")?;
    if config.store.provider == "redis" {
        required(&config.store.url, "store.url")?;
    }
    if config.store.operation_timeout_ms == 0 {
        return Err(Error::configuration(
            "store.operation_timeout_ms must be greater than 0",
        ));
    }
    Ok(())
}

fn validate_session_config(config: &AppConfig) -> Result<()> {
    if config.session.refresh_lock_ttl_secs == 0 {
        return Err(Error::configuration(
            "session.refresh_lock_ttl_secs must be greater than 0",
        ));
    }
    if config.session.refresh_lock_ttl_secs <= config.oidc.http_timeout_secs {
        return Err(Error::configuration(
            "session.refresh_lock_ttl_secs must be greater than oidc.http_timeout_secs",
        ));
    }
    if config.session.refresh_poll_ms == 0 {
        return Err(Error::configuration(
            "session.refresh_poll_ms must be greater than 0",
        ));
    }
    Ok(())
}

fn validate_migration_config(config: &AppConfig) -> Result<()> {
    let migration = &config.migration;
    if migration.poll_interval_ms == 0 {
        return Err(Error::configuration(
            "migration.poll_interval_ms must be greater than 0",
        ));
    }
    if migration.max_wait_secs < migration.poll_interval_ms / 1000 {
        return Err(Error::configuration(
            "migration.max_wait_secs must be at least migration.poll_interval_ms / 1000",
        ));
    }
    if migration.lock_ttl_secs == 0 {
        return Err(Error::configuration(
            "migration.lock_ttl_secs must be greater than 0",
        ));
    }
    if migration
        .command
        .as_ref()
        .is_some_and(|argv| argv.first().is_none_or(|p| p.trim().is_empty()))
    {
        return Err(Error::configuration(
            "migration.command must name a program",
        ));
    }
    Ok(())
}
