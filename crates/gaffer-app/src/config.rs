//! Application configuration.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the fantasy data provider API.
    #[serde(default = "default_provider_base_url")]
    pub provider_base_url: String,

    /// PostgreSQL connection string.
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Connection pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Card-generation worker count.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Period of the readiness daily check (seconds). Default: 24 hours.
    #[serde(default = "default_daily_check_secs")]
    pub daily_check_secs: u64,

    /// Period of the hourly status poll (seconds). Default: 1 hour.
    #[serde(default = "default_status_poll_secs")]
    pub status_poll_secs: u64,
}

fn default_provider_base_url() -> String {
    "https://fantasy.premierleague.com/api".to_string()
}

fn default_database_url() -> String {
    "postgres://localhost/gaffer".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_workers() -> usize {
    gaffer_cards::DEFAULT_WORKERS
}

fn default_daily_check_secs() -> u64 {
    86_400
}

fn default_status_poll_secs() -> u64 {
    3_600
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider_base_url: default_provider_base_url(),
            database_url: default_database_url(),
            max_connections: default_max_connections(),
            workers: default_workers(),
            daily_check_secs: default_daily_check_secs(),
            status_poll_secs: default_status_poll_secs(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file.
    pub fn load() -> AppResult<Self> {
        let config_path =
            std::env::var("GAFFER_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());

        if Path::new(&config_path).exists() {
            Self::from_file(&config_path)
        } else {
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.workers, 5);
        assert_eq!(config.daily_check_secs, 86_400);
        assert_eq!(config.status_poll_secs, 3_600);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config: AppConfig = toml::from_str(
            r#"
            workers = 8
            database_url = "postgres://db.internal/gaffer"
            "#,
        )
        .unwrap();
        assert_eq!(config.workers, 8);
        assert_eq!(config.database_url, "postgres://db.internal/gaffer");
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn test_config_round_trip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.provider_base_url, config.provider_base_url);
    }
}
