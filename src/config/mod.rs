//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::fetch::FetcherConfig;
use crate::models::{default_roster, TrackedPlayer};
use crate::parse_duration;
use crate::rankings::PageSchedule;
use crate::source::FortniteClientConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Upstream API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_leaderboard_ttl")]
    pub leaderboard_ttl: String,

    #[serde(default = "default_past_events_ttl")]
    pub past_events_ttl: String,

    #[serde(default = "default_current_events_ttl")]
    pub current_events_ttl: String,
}

fn default_base_url() -> String {
    "https://prod.api-fortnite.com/api".to_string()
}

fn default_api_key_env() -> String {
    "FORTNITE_API_KEY".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_leaderboard_ttl() -> String {
    "5m".to_string()
}

fn default_past_events_ttl() -> String {
    "1h".to_string()
}

fn default_current_events_ttl() -> String {
    "5m".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            timeout_seconds: default_timeout(),
            leaderboard_ttl: default_leaderboard_ttl(),
            past_events_ttl: default_past_events_ttl(),
            current_events_ttl: default_current_events_ttl(),
        }
    }
}

impl ApiConfig {
    /// The API key from the configured environment variable, if set and non-empty.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    pub fn fetcher_config(&self, api_key: String) -> FetcherConfig {
        FetcherConfig {
            api_key,
            timeout: Duration::from_secs(self.timeout_seconds),
            ..Default::default()
        }
    }

    pub fn client_config(&self) -> Result<FortniteClientConfig, ConfigError> {
        Ok(FortniteClientConfig {
            base_url: self.base_url.clone(),
            leaderboard_ttl: ttl("leaderboard_ttl", &self.leaderboard_ttl)?,
            past_events_ttl: ttl("past_events_ttl", &self.past_events_ttl)?,
            current_events_ttl: ttl("current_events_ttl", &self.current_events_ttl)?,
        })
    }
}

fn ttl(field: &str, value: &str) -> Result<Duration, ConfigError> {
    parse_duration(value).ok_or_else(|| {
        ConfigError::ValidationError(format!("api.{} is not a duration: {:?}", field, value))
    })
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub leaderboard: PageSchedule,

    #[serde(default = "default_roster")]
    pub roster: Vec<TrackedPlayer>,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            api: ApiConfig::default(),
            leaderboard: PageSchedule::default(),
            roster: default_roster(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "API timeout must be greater than 0".to_string(),
            ));
        }

        self.api.client_config()?;

        if self.leaderboard.total_pages == 0 || self.leaderboard.batch_size == 0 {
            return Err(ConfigError::ValidationError(
                "Leaderboard page count and batch size must be greater than 0".to_string(),
            ));
        }

        if self.roster.is_empty() {
            return Err(ConfigError::ValidationError(
                "Roster must list at least one player".to_string(),
            ));
        }

        if let Some(player) = self
            .roster
            .iter()
            .find(|p| p.id.trim().is_empty() || p.username.trim().is_empty())
        {
            return Err(ConfigError::ValidationError(format!(
                "Roster player {:?} needs both an id and a username",
                player.name
            )));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
