//! Client configuration structs
//!
//! Loads configuration from environment variables, with `.env` support.

use serde::Deserialize;
use std::env;

/// Main client configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientConfig {
    pub app: AppSettings,
    pub reactions: ReactionSettings,
    pub notifications: NotificationConfig,
    pub logging: LoggingConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            env: default_env(),
        }
    }
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Settings consumed by the reaction manager
#[derive(Debug, Clone, Deserialize)]
pub struct ReactionSettings {
    /// A persisted catalog older than this is reloaded at startup
    #[serde(default = "default_catalog_max_age_secs")]
    pub catalog_max_age_secs: u64,
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
    #[serde(default = "default_tag_title_max_length")]
    pub tag_title_max_length: usize,
}

impl Default for ReactionSettings {
    fn default() -> Self {
        Self {
            catalog_max_age_secs: default_catalog_max_age_secs(),
            recent_limit: default_recent_limit(),
            tag_title_max_length: default_tag_title_max_length(),
        }
    }
}

/// Notification publisher configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_notification_buffer")]
    pub buffer: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            buffer: default_notification_buffer(),
        }
    }
}

/// Log output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "reaction-client".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_catalog_max_age_secs() -> u64 {
    3600 // 1 hour
}

fn default_recent_limit() -> usize {
    chat_core::MAX_RECENT_REACTIONS
}

fn default_tag_title_max_length() -> usize {
    chat_core::MAX_TAG_TITLE_LENGTH
}

fn default_notification_buffer() -> usize {
    256
}

fn default_log_level() -> String {
    "info".to_string()
}

fn parse_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(None),
    }
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// Every variable is optional; a present but unparsable value is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let env = match env::var("APP_ENV") {
            Ok(raw) => Environment::parse(&raw).ok_or(ConfigError::InvalidValue("APP_ENV", raw))?,
            Err(_) => default_env(),
        };

        let reactions = ReactionSettings {
            catalog_max_age_secs: parse_var("REACTIONS_CATALOG_MAX_AGE_SECS")?
                .unwrap_or_else(default_catalog_max_age_secs),
            recent_limit: parse_var("REACTIONS_RECENT_LIMIT")?.unwrap_or_else(default_recent_limit),
            tag_title_max_length: parse_var("REACTIONS_TAG_TITLE_MAX_LENGTH")?
                .unwrap_or_else(default_tag_title_max_length),
        };
        if reactions.recent_limit == 0 {
            return Err(ConfigError::InvalidValue("REACTIONS_RECENT_LIMIT", "0".to_string()));
        }

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env,
            },
            reactions,
            notifications: NotificationConfig {
                buffer: parse_var("NOTIFICATION_BUFFER")?
                    .unwrap_or_else(default_notification_buffer)
                    .max(1),
            },
            logging: LoggingConfig {
                level: env::var("LOG_LEVEL").unwrap_or_else(|_| default_log_level()),
                json: parse_var("LOG_JSON")?.unwrap_or(env.is_production()),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
