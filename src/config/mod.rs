//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::models::{NotificationTime, ReminderDays, ValidationError};

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

impl From<ValidationError> for ConfigError {
    fn from(e: ValidationError) -> Self {
        ConfigError::ValidationError(e.to_string())
    }
}

/// Daily reminder settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSettings {
    /// Time of the daily check, `HH:MM`
    #[serde(default)]
    pub notification_time: NotificationTime,

    /// Reminder set for records that have none of their own
    #[serde(default)]
    pub default_reminder_days: ReminderDays,
}

/// Raw settings update, as submitted by a client.
///
/// Absent or blank fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default)]
    pub notification_time: Option<String>,
    #[serde(default)]
    pub default_reminder_days: Option<String>,
}

impl ReminderSettings {
    /// Validate every field of `update` and return the merged settings.
    ///
    /// Nothing is applied unless all provided fields are valid.
    pub fn merged(&self, update: &SettingsUpdate) -> Result<Self, ValidationError> {
        let notification_time = match provided(&update.notification_time) {
            Some(t) => NotificationTime::parse(t)?,
            None => self.notification_time,
        };
        let default_reminder_days = match provided(&update.default_reminder_days) {
            Some(d) => ReminderDays::parse(d)?,
            None => self.default_reminder_days.clone(),
        };

        Ok(Self {
            notification_time,
            default_reminder_days,
        })
    }
}

/// A field counts as provided when it is present and not blank.
fn provided(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
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

/// Reminder delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// POST each reminder here when set
    #[serde(default)]
    pub webhook_url: Option<Url>,

    /// Webhook timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_timeout() -> u64 {
    10
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_seconds: default_timeout(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub reminders: ReminderSettings,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub notify: NotifyConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            reminders: ReminderSettings::default(),
            server: ServerConfig::default(),
            notify: NotifyConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            info!("No config file at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reminders.default_reminder_days.is_empty() {
            return Err(ConfigError::ValidationError(
                "Default reminder days must not be empty".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.notify.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Webhook timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
