use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::logging;

/// Environment variable that overrides the config file location.
pub const CONFIG_FILE_VAR: &str = "PTO_CONFIG_FILE";

/// Prefix for environment variable overrides, `PTO_API__BIND_ADDRESS` style.
pub const ENV_PREFIX: &str = "PTO";

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    /// The path to the TLS certificate
    pub cert: String,

    /// The path to the TLS private key
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// The log level to use, this is a tracing env filter
    pub level: String,

    /// What logging mode we should use
    pub mode: logging::Mode,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            mode: logging::Mode::Default,
        }
    }
}

/// Loads a config from an optional TOML file plus environment overrides.
///
/// Returns the parsed config and the file that was actually read, if any.
/// Missing files are not an error, the serde defaults apply.
pub fn parse<C: DeserializeOwned>(enable_env: bool, config_file: Option<String>) -> Result<(C, Option<String>)> {
    let config_file = if enable_env {
        std::env::var(CONFIG_FILE_VAR).ok().or(config_file)
    } else {
        config_file
    };

    let mut builder = config::Config::builder();

    let loaded_file = match config_file {
        Some(path) if Path::new(&path).exists() => {
            builder = builder.add_source(config::File::new(&path, config::FileFormat::Toml));
            Some(path)
        }
        _ => None,
    };

    if enable_env {
        builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"));
    }

    let config = builder
        .build()
        .context("failed to load config sources")?
        .try_deserialize()
        .context("failed to deserialize config")?;

    Ok((config, loaded_file))
}
