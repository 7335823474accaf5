//! Configuration management

use crate::core::error::{Error, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub data: DataConfig,
    pub server: ServerConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default listing cap for transaction results
    pub default_limit: usize,
    /// Intent score below this adds a low-confidence warning
    pub confidence_threshold: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Path to the transactions CSV
    pub transactions: PathBuf,
    /// Optional merchant lexicon override (one merchant per line)
    pub merchants: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Query response cache TTL (seconds)
    pub query_ttl: u64,
    /// Maximum cached query responses
    pub max_queries: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            data: DataConfig::default(),
            server: ServerConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            confidence_threshold: 0.3,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            transactions: PathBuf::from("data/transactions.csv"),
            merchants: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8710,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            query_ttl: 60,
            max_queries: 1000,
        }
    }
}

impl Config {
    /// Load configuration from default location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = Self::tally_home()?;
        Ok(home.join("config.toml"))
    }

    /// Get the tally home directory
    pub fn tally_home() -> Result<PathBuf> {
        // Check TALLY_HOME env var first
        if let Ok(home) = std::env::var("TALLY_HOME") {
            return Ok(PathBuf::from(home));
        }

        // Use XDG directories
        ProjectDirs::from("dev", "tally", "tally")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| Error::ConfigError {
                message: "Could not determine tally home directory".to_string(),
            })
    }

    /// Ensure home directory exists
    pub fn ensure_home() -> Result<()> {
        let home = Self::tally_home()?;
        if !home.exists() {
            std::fs::create_dir_all(&home)?;
        }
        Ok(())
    }
}
