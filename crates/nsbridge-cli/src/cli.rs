use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nsbridge_auth::token::PRIVATE_KEY_LABEL;

#[derive(Parser)]
#[command(name = "nsbridge")]
#[command(about = "NetSuite identity connector: contact lookup and reset-on-login")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Connector config file (TOML). Defaults to ./nsbridge.toml when present
    #[arg(short, long, global = true, env = "NSBRIDGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, env = "NSBRIDGE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Look up the active contact for an email
    Lookup(LookupArgs),
    /// Run the login flow (never succeeds; known contacts get a reset email)
    Login(LoginArgs),
    /// Normalize a PEM key read from stdin
    NormalizePem(NormalizePemArgs),
    /// Sign a client assertion and print its header and claims
    Assertion,
}

#[derive(clap::Args)]
pub struct LookupArgs {
    /// Contact email
    #[arg(short, long)]
    pub email: String,
}

#[derive(clap::Args)]
pub struct LoginArgs {
    /// Contact email
    #[arg(short, long)]
    pub email: String,
    /// Password (accepted but not checked)
    #[arg(long, env = "NSBRIDGE_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,
}

#[derive(clap::Args)]
pub struct NormalizePemArgs {
    /// PEM label for the output
    #[arg(long, default_value = PRIVATE_KEY_LABEL)]
    pub label: String,
}
