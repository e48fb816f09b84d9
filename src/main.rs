//! searchlens - AI answers for search result pages
//!
//! Main entry point for the searchlens CLI and WebSocket bridge.

mod cli;
mod cmd_ask;
mod cmd_config;
mod register;
mod server;

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing::warn;

use searchlens_config::{Settings, SettingsLoader, SettingsValidator};

use crate::cli::{Cli, Commands};

fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    SettingsLoader::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load settings from {}", cli.config.display()))
}

fn validate_settings(path: &Path, settings: &Settings) -> anyhow::Result<()> {
    let result = SettingsValidator::validate(settings);
    for warning in &result.warnings {
        warn!("{}: {}", warning.path, warning.message);
    }
    if !result.is_valid() {
        let errors: Vec<String> = result
            .errors
            .iter()
            .map(|e| format!("  {}: {}", e.path, e.message))
            .collect();
        anyhow::bail!("Invalid settings in {}:\n{}", path.display(), errors.join("\n"));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(&cli)?;

    let command = cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
    });

    // One-shot commands print their result to stdout; keep the console quiet.
    let default_level = match command {
        Commands::Serve { .. } => "info",
        _ => "warn",
    };
    server::init_tracing(&settings.logging, default_level)?;
    validate_settings(&cli.config, &settings)?;

    match command {
        Commands::Serve { host, port } => {
            let mut settings = settings;
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            server::run_server(settings).await
        }
        Commands::Ask { query, provider } => {
            cmd_ask::ask(&settings, &query, provider.as_deref()).await
        }
        Commands::Status => cmd_config::status(&settings).await,
        Commands::Toggle => cmd_config::toggle(&settings).await,
        Commands::Open => cmd_ask::open(&settings).await,
        Commands::Probe => cmd_ask::probe(&settings).await,
        Commands::Config { action } => cmd_config::handle_config_command(&settings, action).await,
    }
}
