//! Connector configuration loading for the CLI.
//!
//! Sources, lowest to highest precedence:
//! 1. a TOML file (`--config`, `NSBRIDGE_CONFIG`, or `./nsbridge.toml`)
//! 2. environment variables such as `NSBRIDGE__PRIVATE_KEY`

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use nsbridge_auth::ConnectorConfig;

pub const DEFAULT_CONFIG_PATH: &str = "nsbridge.toml";
pub const ENV_PREFIX: &str = "NSBRIDGE";

/// Where the configuration file came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config` or `NSBRIDGE_CONFIG`
    Explicit(PathBuf),
    /// `./nsbridge.toml`
    Default(PathBuf),
    /// No file; environment only
    Environment,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(p) => write!(f, "{}", p.display()),
            Self::Default(p) => write!(f, "{} (default)", p.display()),
            Self::Environment => f.write_str("environment"),
        }
    }
}

pub fn resolve_source(explicit: Option<&Path>) -> ConfigSource {
    match explicit {
        Some(p) => ConfigSource::Explicit(p.to_path_buf()),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                ConfigSource::Default(default_path)
            } else {
                ConfigSource::Environment
            }
        }
    }
}

/// Loads the connector configuration from `source` plus environment overrides.
///
/// Only shape is checked here; the connector validates the settings each mode
/// requires when it runs.
pub fn load_config(source: &ConfigSource) -> Result<ConnectorConfig> {
    load_config_with_env(source, Environment::with_prefix(ENV_PREFIX).separator("__"))
}

fn load_config_with_env(source: &ConfigSource, env: Environment) -> Result<ConnectorConfig> {
    let mut builder = Config::builder();
    match source {
        ConfigSource::Explicit(p) | ConfigSource::Default(p) => {
            builder = builder.add_source(
                File::from(p.as_path())
                    .format(FileFormat::Toml)
                    .required(true),
            );
        }
        ConfigSource::Environment => {}
    }
    // Values stay strings: ids such as client_id may have leading zeros.
    builder = builder.add_source(env);

    builder
        .build()
        .with_context(|| format!("Failed to read configuration from {source}"))?
        .try_deserialize()
        .context("Invalid connector configuration")
}
