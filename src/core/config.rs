//! Configuration management for the server.
//!
//! Values come from defaults, overridden by `MCP_*` environment variables
//! (a `.env` file is honored through `dotenvy`).

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Default timeout for requests to a remote drug API.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 10;

/// Main configuration structure for the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Where drug data is read from.
    pub data: DataConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Drug data source configuration.
///
/// A remote API takes precedence over a local JSON file. With neither set
/// the server starts with an empty catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// JSON file holding drug records.
    pub json_path: Option<PathBuf>,

    /// Base URL of a drug REST API.
    pub api_url: Option<String>,

    /// Per-request timeout for the REST API, in seconds.
    pub api_timeout_secs: u64,
}

impl DataConfig {
    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            json_path: None,
            api_url: None,
            api_timeout_secs: DEFAULT_API_TIMEOUT_SECS,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "drug-tools-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            data: DataConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`, `MCP_DRUG_API_URL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env();
        config.data = DataConfig::from_env();

        config
    }
}

impl DataConfig {
    fn from_env() -> Self {
        let mut data = Self::default();

        if let Ok(path) = std::env::var("MCP_DRUG_DATA_PATH") {
            data.json_path = Some(PathBuf::from(path));
        }

        if let Ok(url) = std::env::var("MCP_DRUG_API_URL") {
            info!("Drug API configured at {}", url);
            data.api_url = Some(url);
        }

        if let Ok(raw) = std::env::var("MCP_DRUG_API_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => data.api_timeout_secs = secs,
                _ => warn!(
                    "Ignoring invalid MCP_DRUG_API_TIMEOUT_SECS={:?}, using {}s",
                    raw, DEFAULT_API_TIMEOUT_SECS
                ),
            }
        }

        if data.api_url.is_none() && data.json_path.is_none() {
            warn!(
                "Neither MCP_DRUG_API_URL nor MCP_DRUG_DATA_PATH is set - \
                 the drug catalog will be empty"
            );
        }

        data
    }
}
