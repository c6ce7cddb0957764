//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Webhook endpoint section
    #[serde(default)]
    pub webhook: WebhookSection,

    /// Message defaults section
    #[serde(default)]
    pub message: MessageSection,

    /// Retry policy configuration
    #[serde(default)]
    pub retry: RetrySection,
}

/// Webhook endpoint section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookSection {
    /// Webhook URL
    pub url: Option<String>,

    /// Per-request timeout in seconds
    pub timeout: Option<u64>,
}

/// Defaults applied to every message sent.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessageSection {
    /// Display name
    pub username: Option<String>,

    /// Target channel
    pub channel: Option<String>,

    /// Avatar emoji
    pub icon_emoji: Option<String>,

    /// Avatar image URL
    pub icon_url: Option<String>,
}

/// Retry policy configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySection {
    /// Whether failed sends are retried at all
    pub enabled: Option<bool>,

    /// Maximum number of retries after the first attempt
    pub max_retries: Option<u32>,

    /// Fixed wait between attempts in seconds, used when backoff is off
    pub interval: Option<u64>,

    /// Whether waits grow exponentially
    pub backoff: Option<bool>,

    /// First backoff wait in seconds
    pub initial_interval: Option<u64>,

    /// Backoff cap in seconds
    pub max_interval: Option<u64>,

    /// Backoff multiplier
    pub multiplier: Option<f64>,

    /// Whether backoff waits are randomized
    pub jitter: Option<bool>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r##"# samhook configuration file

[webhook]
# Incoming webhook URL (required, can be overridden by --url)
# url = "https://hooks.slack.com/services/T000/B000/XXXX"

# Per-request timeout in seconds (default: 10)
# timeout = 10

[message]
# Defaults applied to every message; send options override them
# username = "samhook"
# channel = "#general"
# icon_emoji = ":robot_face:"
# icon_url = "https://example.com/avatar.png"

[retry]
# Retry failed sends (default: true)
# enabled = true

# Maximum number of retries after the first attempt (default: 3)
# max_retries = 3

# Grow the wait exponentially between attempts (default: true)
# backoff = true

# Fixed wait in seconds, used when backoff = false (default: 1)
# interval = 1

# First backoff wait in seconds (default: 1)
# initial_interval = 1

# Backoff cap in seconds (default: 30)
# max_interval = 30

# Backoff multiplier, at least 1.0 (default: 2.0)
# multiplier = 2.0

# Randomize each backoff wait by up to 10% (default: true)
# jitter = true
"##
    .to_string()
}
