//! Configuration management for taxadb

use crate::error::{TaxadbError, TaxadbResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Download settings
    #[serde(default)]
    pub download: DownloadConfig,

    /// Database settings
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Settings for fetching files from NCBI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Base URL of the NCBI file server
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Overall request timeout in seconds (taxonomy files are large)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

/// Settings for building the local store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Rows per INSERT statement when bulk-loading taxa
    #[serde(default = "default_taxa_batch_size")]
    pub taxa_batch_size: usize,
}

// Default value functions for serde

fn default_base_url() -> String {
    "https://ftp.ncbi.nlm.nih.gov".to_string()
}

fn default_timeout_secs() -> u64 {
    1800
}

fn default_connect_timeout_secs() -> u64 {
    30
}

fn default_taxa_batch_size() -> usize {
    500
}

impl Default for DownloadConfig {
    fn default() -> Self {
        DownloadConfig {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            taxa_batch_size: default_taxa_batch_size(),
        }
    }
}

/// Get the default configuration
pub fn default_config() -> Config {
    Config::default()
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> TaxadbResult<Config> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let config: Config = toml::from_str(&content)
        .map_err(|e| TaxadbError::Configuration(format!("invalid config file: {}", e)))?;
    Ok(config)
}

/// Save configuration to a TOML file
pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> TaxadbResult<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| TaxadbError::Configuration(format!("cannot serialize config: {}", e)))?;
    std::fs::write(path.as_ref(), content)?;
    Ok(())
}

/// Locate the effective configuration.
///
/// An explicit path wins, then `$TAXADB_HOME/config.toml` if it exists,
/// otherwise the built-in defaults.
pub fn resolve_config(explicit: Option<&Path>) -> TaxadbResult<Config> {
    if let Some(path) = explicit {
        return load_config(path);
    }

    if let Ok(home) = std::env::var("TAXADB_HOME") {
        let path = Path::new(&home).join("config.toml");
        if path.exists() {
            return load_config(&path);
        }
    }

    Ok(Config::default())
}
