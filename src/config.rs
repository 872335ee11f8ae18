//! Configuration management for the notary ledger

use crate::error::ChainError;
use crate::miner::{DEFAULT_DIFFICULTY, MAX_DIFFICULTY};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// File read by [`load_config`] unless `NOTARY_CONFIG` points elsewhere.
pub const CONFIG_FILE: &str = "notary.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    #[serde(default = "default_difficulty")]
    pub difficulty: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            difficulty: default_difficulty(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    fn validate(&self) -> Result<(), ChainError> {
        if self.ledger.difficulty == 0 || self.ledger.difficulty > MAX_DIFFICULTY {
            return Err(ChainError::Config(format!(
                "ledger.difficulty must be between 1 and {}, got {}",
                MAX_DIFFICULTY, self.ledger.difficulty
            )));
        }

        if self.api.host.is_empty() {
            return Err(ChainError::Config("api.host must not be empty".to_string()));
        }

        Ok(())
    }
}

fn default_difficulty() -> usize {
    DEFAULT_DIFFICULTY
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Load the process configuration: `$NOTARY_CONFIG` or `notary.toml`, then
/// the `PORT` environment override.
pub fn load_config() -> Result<Config, ChainError> {
    let path = std::env::var("NOTARY_CONFIG").unwrap_or_else(|_| CONFIG_FILE.to_string());
    let mut config = load_config_from(&path)?;

    if let Ok(port) = std::env::var("PORT") {
        config.api.port = port
            .parse()
            .map_err(|e| ChainError::Config(format!("PORT is not a valid port: {}", e)))?;
    }

    Ok(config)
}

/// Load configuration from `path`. A missing file yields the defaults.
pub fn load_config_from(path: impl AsRef<Path>) -> Result<Config, ChainError> {
    let config_str = match fs::read_to_string(path.as_ref()) {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    let config: Config = if config_str.trim().is_empty() {
        Config::default()
    } else {
        toml::from_str(&config_str)?
    };

    config.validate()?;
    Ok(config)
}
