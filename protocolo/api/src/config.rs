use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use common::config::{LoggingConfig, TlsConfig};

use crate::delivery::DeliveryMode;

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
/// The API is the backend for the protocolo record registry
pub struct AppConfig {
    /// The path to the config file
    pub config_file: Option<String>,

    /// Name of this instance
    pub name: String,

    /// The logging config
    pub logging: LoggingConfig,

    /// API Config
    pub api: ApiConfig,

    /// Database Config
    pub database: DatabaseConfig,

    /// Session Config
    pub session: SessionConfig,

    /// Label Config
    pub label: LabelConfig,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Bind address for the API
    pub bind_address: SocketAddr,

    /// If we should use TLS for the API server
    pub tls: Option<TlsConfig>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: "[::]:4000".parse().expect("failed to parse bind address"),
            tls: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// The database URL to use
    pub uri: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: "sqlite://protocolo.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// How long a login session stays valid, in seconds
    pub validity_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            validity_secs: 60 * 60 * 24 * 7, // 7 days
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Directory the generated label PDFs are written to
    pub output_dir: PathBuf,

    /// How many times to probe for the written file before giving up
    pub poll_attempts: u32,

    /// Delay between existence probes, in milliseconds
    pub poll_interval_ms: u64,

    /// How `/print/direct` hands the label to the host OS
    pub dispatch: DeliveryMode,

    /// Title line printed at the top of every label
    pub title: String,

    /// Contact line printed at the bottom of every label
    pub contact: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("generated"),
            poll_attempts: 5,
            poll_interval_ms: 100,
            dispatch: DeliveryMode::OpenWithDefaultHandler,
            title: "Câmara de Vereadores de Glória do Goitá".to_string(),
            contact: "Email: camaraggp@gmail.com".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: Some("config.toml".to_string()),
            name: "protocolo-api".to_string(),
            logging: LoggingConfig::default(),
            api: ApiConfig::default(),
            database: DatabaseConfig::default(),
            session: SessionConfig::default(),
            label: LabelConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn parse() -> Result<Self> {
        let (mut config, config_file) = common::config::parse::<Self>(!cfg!(test), Self::default().config_file)?;

        config.config_file = config_file;

        Ok(config)
    }
}
