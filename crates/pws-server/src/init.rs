//! Server Initialization
//!
//! Startup order:
//!
//! 1. Load configuration and install logging
//! 2. Build the application context (store, identity provider, services)
//! 3. Ping the store; a failure is a warning, the store may come up later
//! 4. Run the migration gate, at most once across all processes
//! 5. Serve HTTP until shutdown
//! 6. Close the store connection

use std::path::Path;
use std::sync::Arc;

use pws_application::MigrationOutcome;
use pws_infrastructure::config::{AppConfig, ConfigLoader};
use pws_infrastructure::di::{AppContext, init_app};
use pws_infrastructure::logging::init_logging;
use tracing::{error, info, warn};

use crate::app::build_rocket;
use crate::state::ServerState;

/// Run the pad workspace session server
pub async fn run_server(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    init_logging(&config.logging)?;

    info!(
        host = %config.server.host,
        port = config.server.port,
        store = %config.store.provider,
        "Starting pad workspace session server"
    );

    let host = config.server.host.clone();
    let port = config.server.port;
    let context = Arc::new(init_app(config).await?);

    check_store(&context).await;
    let migration = migration_gate(&context).await;

    let figment = rocket::Config::figment()
        .merge(("address", host))
        .merge(("port", port));
    let served = build_rocket(ServerState::new(Arc::clone(&context), migration))
        .configure(figment)
        .launch()
        .await;

    if let Err(e) = context.kv_store().close().await {
        warn!(error = %e, "Failed to close key-value store");
    }

    match served {
        Ok(_) => {
            info!("Server stopped");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Server failed");
            Err(Box::new(e))
        }
    }
}

/// Load configuration from an optional path
fn load_config(config_path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let loader = match config_path {
        Some(path) => ConfigLoader::new().with_config_path(path),
        None => ConfigLoader::new(),
    };
    Ok(loader.load()?)
}

/// Log store connectivity without failing startup
pub async fn check_store(context: &AppContext) -> bool {
    let check = context.health().check_store().await;
    if check.status.is_healthy() {
        info!(
            provider = context.kv_store().provider_name(),
            elapsed_ms = check.response_time_ms,
            "Key-value store reachable"
        );
        true
    } else {
        warn!(
            provider = context.kv_store().provider_name(),
            error = check.error.as_deref().unwrap_or("unknown"),
            "Key-value store unreachable at startup, continuing"
        );
        false
    }
}

/// Run the startup migration gate, or skip it when disabled
pub async fn migration_gate(context: &AppContext) -> MigrationOutcome {
    if !context.config.migration.enabled {
        info!("Startup migrations disabled");
        return MigrationOutcome::Skipped;
    }
    let runner = context.migration_runner();
    let outcome = context.migration_lock().run(runner.as_ref()).await;
    match &outcome {
        MigrationOutcome::Migrated => info!(runner = runner.name(), "Migrations applied"),
        MigrationOutcome::AlreadyMigrated => info!("Already migrated by another process"),
        MigrationOutcome::Degraded => warn!("Serving in degraded mode, migration state unknown"),
        MigrationOutcome::Skipped => {}
        MigrationOutcome::Failed { message } => {
            error!(error = %message, "Startup migration failed, serving anyway");
        }
    }
    outcome
}
