//! Process configuration for paddock-bot.
//!
//! Configuration is merged from two sources, lowest priority first:
//!
//! 1. A TOML file (`paddock.toml` by default)
//! 2. Environment variables (`PADDOCK_*`), with `.env` files honored in
//!    development via `dotenvy`
//!
//! Secrets (the NocoDB token, the Shlink API key) are never read from the
//! file; they come from the environment only.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use paddock_core::Tag;

/// Error types for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl ConfigError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub nocodb: NocoSettings,
    pub lab: LabSettings,
    pub shlink: ShlinkSettings,
    pub refresh: RefreshSettings,
    pub features: FeatureSettings,
    pub permissions: PermissionSettings,
}

/// Connection settings for the NocoDB membership store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NocoSettings {
    /// Base URL of the NocoDB instance.
    pub base_url: String,

    /// API token, environment-only (`PADDOCK_NOCODB_TOKEN`).
    #[serde(skip)]
    pub api_token: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for NocoSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_token: String::new(),
            timeout_secs: 10,
        }
    }
}

/// Connection settings for the lab presence backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LabSettings {
    /// Base URL of the lab API.
    pub base_url: String,
}

/// Connection settings for the Shlink URL shortener.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShlinkSettings {
    /// Base URL of the Shlink server.
    pub base_url: String,

    /// API key, environment-only (`PADDOCK_SHLINK_API_KEY`).
    #[serde(skip)]
    pub api_key: String,
}

/// Membership snapshot refresh schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshSettings {
    /// Cron expression for the recurring membership refresh.
    pub cron: String,

    /// How often the scheduler checks whether the cron schedule is due,
    /// in seconds.
    pub check_interval_secs: u64,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            cron: "0 * * * *".to_string(),
            check_interval_secs: 60,
        }
    }
}

/// Feature toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureSettings {
    /// When disabled, command handlers skip authorization checks entirely.
    pub enforce_authorization: bool,
}

impl Default for FeatureSettings {
    fn default() -> Self {
        Self {
            enforce_authorization: true,
        }
    }
}

/// Named permission lists consumed by command handlers.
///
/// Each list enumerates the tags (groups or individual users) allowed to
/// invoke the commands gated by that list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionSettings {
    /// General-purpose commands (`/start`, `/id`, `/tags`, `/ore`, `/qr`).
    pub general: Vec<Tag>,

    /// Quiz-related commands.
    pub quiz: Vec<Tag>,
}

impl AppConfig {
    /// Loads configuration from `path` (if it exists), then overlays
    /// environment variables and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// merged configuration fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let path = path.as_ref();
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)?
        } else {
            debug!(path = %path.display(), "Config file not found, using defaults");
            Self::default()
        };

        config.apply_env_from(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| ConfigError::parse(format!("TOML parse error: {e}")))
    }

    /// Overlays configuration values from an environment lookup.
    ///
    /// Empty values are treated as unset.
    pub fn apply_env_from(&mut self, get: impl Fn(&str) -> Option<String>) {
        let var = |name: &str| get(name).filter(|v| !v.is_empty());

        if let Some(v) = var("PADDOCK_NOCODB_URL") {
            self.nocodb.base_url = v;
        }
        if let Some(v) = var("PADDOCK_NOCODB_TOKEN") {
            self.nocodb.api_token = v;
        }
        if let Some(v) = var("PADDOCK_LAB_URL") {
            self.lab.base_url = v;
        }
        if let Some(v) = var("PADDOCK_SHLINK_URL") {
            self.shlink.base_url = v;
        }
        if let Some(v) = var("PADDOCK_SHLINK_API_KEY") {
            self.shlink.api_key = v;
        }
        if let Some(v) = var("PADDOCK_REFRESH_CRON") {
            self.refresh.cron = v;
        }
    }

    /// Validates the merged configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when a required setting is missing or nonsensical.
    pub fn validate(&self) -> Result<()> {
        if self.nocodb.base_url.is_empty() {
            return Err(ConfigError::validation(
                "nocodb.base_url is required (or set PADDOCK_NOCODB_URL)",
            ));
        }
        if self.nocodb.api_token.is_empty() {
            return Err(ConfigError::validation(
                "NocoDB API token is required (set PADDOCK_NOCODB_TOKEN)",
            ));
        }
        if self.refresh.cron.is_empty() {
            return Err(ConfigError::validation("refresh.cron must not be empty"));
        }
        if self.refresh.check_interval_secs == 0 {
            return Err(ConfigError::validation(
                "refresh.check_interval_secs must be greater than zero",
            ));
        }
        Ok(())
    }
}
