mod cli;
mod commands;
mod config;
mod observability;
mod output;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use nsbridge_auth::{ConnectorConfig, ConnectorError};

use cli::{Cli, Commands};
use output::{print_auth_failure, print_error};

/// Login rejected (invalid credentials or reset required).
const EXIT_AUTH_FAILURE: u8 = 1;
/// Configuration or operational fault.
const EXIT_FAULT: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (before anything else)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist - it's optional
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    let cli = Cli::parse();
    observability::init_tracing(&cli.log_level);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}

async fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Lookup(args) => commands::connector::lookup(load(&cli)?, args).await,
        Commands::Login(args) => commands::connector::login(load(&cli)?, args).await,
        Commands::NormalizePem(args) => commands::keys::normalize(args),
        Commands::Assertion => commands::keys::assertion(load(&cli)?),
    }
}

fn load(cli: &Cli) -> Result<ConnectorConfig> {
    let source = config::resolve_source(cli.config.as_deref());
    let connector_config = config::load_config(&source)?;
    tracing::debug!(source = %source, config = ?connector_config, "Configuration loaded");
    Ok(connector_config)
}

fn report(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<ConnectorError>() {
        Some(ConnectorError::AuthFailure { kind, message }) => {
            print_auth_failure(*kind, message);
            ExitCode::from(EXIT_AUTH_FAILURE)
        }
        _ => {
            print_error(&format!("{err:#}"));
            ExitCode::from(EXIT_FAULT)
        }
    }
}
