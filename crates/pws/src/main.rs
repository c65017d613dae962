//! Pad Workspace Session - Entry Point
//!
//! | Command | Description |
//! |---------|-------------|
//! | `pws` | Serve HTTP (same as `pws serve`) |
//! | `pws serve` | Serve HTTP |
//! | `pws check-config` | Load and validate configuration, print it as JSON |
//! | `pws providers` | List registered key-value store backends |

// Force-link pws-providers so linkme registrations are included
extern crate pws_providers;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pws_application::ports::registry::list_kv_store_providers;
use pws_infrastructure::config::ConfigLoader;
use pws_server::run_server;

/// Command line interface for the pad workspace session server
#[derive(Parser, Debug)]
#[command(name = "pws")]
#[command(about = "Pad workspace session server")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve HTTP
    Serve,
    /// Load and validate configuration, then print it
    CheckConfig,
    /// List registered key-value store backends
    Providers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => run_server(cli.config.as_deref())
            .await
            .map_err(|e| anyhow::anyhow!("{e}")),
        Command::CheckConfig => {
            let loader = match &cli.config {
                Some(path) => ConfigLoader::new().with_config_path(path),
                None => ConfigLoader::new(),
            };
            let mut config = loader.load().context("Invalid configuration")?;
            if config.oidc.client_secret.is_some() {
                config.oidc.client_secret = Some("***".to_string());
            }
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Command::Providers => {
            for (name, description) in list_kv_store_providers() {
                println!("{name:<10} {description}");
            }
            Ok(())
        }
    }
}
