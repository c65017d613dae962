//! Configuration loading tests
//!
//! Environment overrides run inside `figment::Jail`, which serializes the
//! tests touching process state and restores it afterwards.

use std::time::Duration;

use figment::Jail;
use pws_infrastructure::config::loader::validate_app_config;
use pws_infrastructure::config::{AppConfig, ConfigLoader};
use pws_infrastructure::constants::{
    DEFAULT_EXPIRY_MARGIN_SECS, DEFAULT_HTTP_PORT, DEFAULT_STORE_PROVIDER,
};
use tempfile::TempDir;

const MINIMAL_TOML: &str = r#"
[oidc]
discovery_url = "https://idp.test/realms/pad/.well-known/openid-configuration"
client_id = "pad-client"
redirect_uri = "http://localhost:8000/auth/callback"
"#;

fn valid_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.oidc.discovery_url =
        "https://idp.test/realms/pad/.well-known/openid-configuration".to_string();
    config.oidc.client_id = "pad-client".to_string();
    config.oidc.redirect_uri = "http://localhost:8000/auth/callback".to_string();
    config
}

#[test]
fn test_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.server.port, DEFAULT_HTTP_PORT);
    assert!(config.server.secure_cookies);
    assert_eq!(config.store.provider, DEFAULT_STORE_PROVIDER);
    assert_eq!(config.session.expiry_margin_secs, DEFAULT_EXPIRY_MARGIN_SECS);
    assert!(config.migration.enabled);
    assert!(config.migration.command.is_none());
    assert_eq!(config.oidc.scopes, vec!["openid", "profile", "email"]);
}

#[test]
fn test_defaults_fail_validation_without_oidc() {
    let err = validate_app_config(&AppConfig::default()).unwrap_err();
    assert!(err.to_string().contains("oidc.discovery_url"));
}

#[test]
fn test_audience_falls_back_to_client_id() {
    let mut config = valid_config();
    assert_eq!(config.oidc.audience(), "pad-client");

    config.oidc.audience = Some(String::new());
    assert_eq!(config.oidc.audience(), "pad-client");

    config.oidc.audience = Some("account".to_string());
    assert_eq!(config.oidc.audience(), "account");
}

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pws.toml");
    std::fs::write(
        &path,
        format!("{MINIMAL_TOML}\n[server]\nport = 9100\n\n[store]\nprovider = \"memory\"\n"),
    )
    .unwrap();

    let config = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("PWS_TEST_FILE")
        .load()
        .unwrap();
    assert_eq!(config.oidc.client_id, "pad-client");
    assert_eq!(config.server.port, 9100);
    assert_eq!(config.store.provider, "memory");
    // untouched sections keep their defaults
    assert_eq!(config.session.expiry_margin_secs, DEFAULT_EXPIRY_MARGIN_SECS);
}

#[test]
fn test_missing_file_falls_back_to_defaults_and_fails_validation() {
    let dir = TempDir::new().unwrap();
    let result = ConfigLoader::new()
        .with_config_path(dir.path().join("absent.toml"))
        .with_env_prefix("PWS_TEST_ABSENT")
        .load();
    assert!(result.is_err());
}

#[test]
fn test_env_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file("pws.toml", MINIMAL_TOML)?;
        jail.set_env("PWS__SERVER__PORT", "9200");
        jail.set_env("PWS__OIDC__CLIENT_ID", "env-client");
        jail.set_env("PWS__MIGRATION__ENABLED", "false");

        let config = ConfigLoader::new()
            .with_config_path("pws.toml")
            .load()
            .map_err(|e| e.to_string())?;
        assert_eq!(config.server.port, 9200);
        assert_eq!(config.oidc.client_id, "env-client");
        assert!(!config.migration.enabled);
        Ok(())
    });
}

#[test]
fn test_default_location_in_working_directory() {
    Jail::expect_with(|jail| {
        jail.create_file("pws.toml", MINIMAL_TOML)?;

        let config = ConfigLoader::new().load().map_err(|e| e.to_string())?;
        assert_eq!(config.oidc.client_id, "pad-client");
        Ok(())
    });
}

#[test]
fn test_custom_env_prefix() {
    Jail::expect_with(|jail| {
        jail.create_file("pws.toml", MINIMAL_TOML)?;
        jail.set_env("PADWS__STORE__NAMESPACE", "staging");

        let config = ConfigLoader::new()
            .with_config_path("pws.toml")
            .with_env_prefix("PADWS")
            .load()
            .map_err(|e| e.to_string())?;
        assert_eq!(config.store.namespace, "staging");
        Ok(())
    });
}

#[test]
fn test_save_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("saved.toml");
    let mut config = valid_config();
    config.migration.command = Some(vec!["alembic".to_string(), "upgrade".to_string()]);

    let loader = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("PWS_TEST_SAVE");
    loader.save_to_file(&config, &path).unwrap();
    let reloaded = loader.load().unwrap();

    assert_eq!(reloaded.oidc.redirect_uri, config.oidc.redirect_uri);
    assert_eq!(reloaded.migration.command, config.migration.command);
    assert_eq!(loader.config_path(), Some(path.as_path()));
}

#[test]
fn test_redis_requires_url() {
    let mut config = valid_config();
    config.store.url = String::new();
    assert!(validate_app_config(&config).is_err());

    config.store.provider = "memory".to_string();
    assert!(validate_app_config(&config).is_ok());
}

#[test]
fn test_invalid_timings_rejected() {
    let mut config = valid_config();
    config.session.refresh_poll_ms = 0;
    assert!(validate_app_config(&config).is_err());

    let mut config = valid_config();
    config.migration.lock_ttl_secs = 0;
    assert!(validate_app_config(&config).is_err());

    let mut config = valid_config();
    config.migration.max_wait_secs = 1;
    config.migration.poll_interval_ms = 5_000;
    assert!(validate_app_config(&config).is_err());

    let mut config = valid_config();
    config.store.operation_timeout_ms = 0;
    assert!(validate_app_config(&config).is_err());
}

#[test]
fn test_refresh_lock_must_outlive_oidc_timeout() {
    let config = valid_config();
    assert!(config.session.refresh_lock_ttl_secs > config.oidc.http_timeout_secs);
    assert!(validate_app_config(&config).is_ok());

    let mut config = valid_config();
    config.session.refresh_lock_ttl_secs = config.oidc.http_timeout_secs;
    let err = validate_app_config(&config).unwrap_err();
    assert!(err.to_string().contains("oidc.http_timeout_secs"));

    config.oidc.http_timeout_secs = 5;
    assert!(validate_app_config(&config).is_ok());
}

#[test]
fn test_zero_migration_poll_interval_rejected() {
    let mut config = valid_config();
    config.migration.poll_interval_ms = 0;
    let err = validate_app_config(&config).unwrap_err();
    assert!(err.to_string().contains("migration.poll_interval_ms"));
}

#[test]
fn test_empty_migration_command_rejected() {
    let mut config = valid_config();
    config.migration.command = Some(Vec::new());
    assert!(validate_app_config(&config).is_err());

    config.migration.command = Some(vec![" ".to_string()]);
    assert!(validate_app_config(&config).is_err());
}

#[test]
fn test_duration_helpers() {
    let config = valid_config();
    assert_eq!(
        config.session.expiry_margin(),
        Duration::from_secs(DEFAULT_EXPIRY_MARGIN_SECS)
    );
    assert_eq!(config.migration.poll_interval(), Duration::from_millis(1000));
    assert_eq!(config.store.operation_timeout(), Duration::from_millis(2000));
}
