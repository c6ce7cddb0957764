//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use url::Url;

use crate::validator::validate_webhook_url;
use crate::webhook::{ExponentialBackoff, RetryPolicy};

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Identity fields applied to every message sent.
///
/// Empty strings mean "use the webhook's own default".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageDefaults {
    /// Display name
    pub username: String,
    /// Target channel
    pub channel: String,
    /// Avatar emoji
    pub icon_emoji: String,
    /// Avatar image URL
    pub icon_url: String,
}

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Webhook URL (required)
    pub url: Url,

    /// Per-request timeout
    pub timeout: Duration,

    /// Retry policy for failed sends
    pub retry_policy: RetryPolicy,

    /// Identity fields for outgoing messages
    pub message: MessageDefaults,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let backoff = self.retry_policy.backoff.as_ref().map_or_else(
            || format!("fixed {}s", self.retry_policy.base_interval.as_secs()),
            |b| {
                format!(
                    "exponential {}s..{}s x{}{}",
                    b.initial_interval.as_secs(),
                    b.max_interval.as_secs(),
                    b.multiplier,
                    if b.jitter { " +jitter" } else { "" }
                )
            },
        );

        write!(
            f,
            "Config {{ url: {}, timeout: {}s, retries: {}, wait: {}, username: {:?}, channel: {:?} }}",
            redact(&self.url),
            self.timeout.as_secs(),
            self.retry_policy.max_retries,
            backoff,
            self.message.username,
            self.message.channel,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The URL is missing or invalid
    /// - The timeout is zero
    /// - The retry settings are inconsistent
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let url = Self::resolve_url(cli, toml)?;
        let timeout = Self::resolve_timeout(cli, toml)?;
        let retry_policy = Self::build_retry_policy(cli, toml)?;
        let message = Self::resolve_message(cli, toml);

        Ok(Self {
            url,
            timeout,
            retry_policy,
            message,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_url(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Url, ConfigError> {
        let url_str = cli
            .url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.webhook.url.as_deref()))
            .ok_or_else(|| {
                ConfigError::missing(field::URL, "Use --url or set webhook.url in config file")
            })?;

        validate_webhook_url(url_str).map_err(|e| ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason: e.to_string(),
        })
    }

    fn resolve_timeout(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Duration, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let seconds = cli
            .timeout
            .or_else(|| toml.and_then(|t| t.webhook.timeout))
            .unwrap_or(defaults::TIMEOUT_SECS);

        if seconds == 0 {
            return Err(ConfigError::InvalidDuration {
                field: field::TIMEOUT,
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Duration::from_secs(seconds))
    }

    fn build_retry_policy(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<RetryPolicy, ConfigError> {
        let retry = toml.map(|t| &t.retry);

        let max_retries = cli
            .retry_max
            .or_else(|| retry.and_then(|r| r.max_retries))
            .unwrap_or(defaults::RETRY_MAX_RETRIES);

        let interval_secs = cli
            .retry_interval
            .or_else(|| retry.and_then(|r| r.interval))
            .unwrap_or(defaults::RETRY_INTERVAL_SECS);

        let initial_secs = retry
            .and_then(|r| r.initial_interval)
            .unwrap_or(defaults::RETRY_INITIAL_INTERVAL_SECS);

        let max_secs = retry
            .and_then(|r| r.max_interval)
            .unwrap_or(defaults::RETRY_MAX_INTERVAL_SECS);

        let multiplier = retry
            .and_then(|r| r.multiplier)
            .unwrap_or(defaults::RETRY_MULTIPLIER);

        // Flags only disable; a TOML `false` is not re-enabled by the CLI
        let enabled = !cli.no_retry && retry.and_then(|r| r.enabled).unwrap_or(true);
        let backoff = !cli.no_backoff && retry.and_then(|r| r.backoff).unwrap_or(true);
        let jitter = !cli.no_jitter && retry.and_then(|r| r.jitter).unwrap_or(true);

        if interval_secs == 0 {
            return Err(ConfigError::InvalidRetry(
                "interval must be greater than 0".to_string(),
            ));
        }

        if initial_secs == 0 {
            return Err(ConfigError::InvalidRetry(
                "initial_interval must be greater than 0".to_string(),
            ));
        }

        if multiplier < 1.0 || !multiplier.is_finite() {
            return Err(ConfigError::InvalidRetry(
                "multiplier must be a finite number >= 1.0".to_string(),
            ));
        }

        if max_secs < initial_secs {
            return Err(ConfigError::InvalidRetry(format!(
                "max_interval ({max_secs}s) must be >= initial_interval ({initial_secs}s)"
            )));
        }

        if !enabled {
            return Ok(RetryPolicy::no_retry());
        }

        let policy = RetryPolicy::new()
            .with_max_retries(max_retries)
            .with_base_interval(Duration::from_secs(interval_secs));

        if !backoff {
            return Ok(policy.without_backoff());
        }

        Ok(policy.with_backoff(
            ExponentialBackoff::new()
                .with_initial_interval(Duration::from_secs(initial_secs))
                .with_max_interval(Duration::from_secs(max_secs))
                .with_multiplier(multiplier)
                .with_jitter(jitter),
        ))
    }

    fn resolve_message(cli: &Cli, toml: Option<&TomlConfig>) -> MessageDefaults {
        let section = toml.map(|t| &t.message);
        let args = cli.send_args();

        let pick = |from_cli: Option<&Option<String>>, from_toml: Option<&Option<String>>| {
            from_cli
                .and_then(Option::as_deref)
                .or_else(|| from_toml.and_then(Option::as_deref))
                .unwrap_or_default()
                .to_string()
        };

        MessageDefaults {
            username: pick(
                args.map(|a| &a.username),
                section.map(|s| &s.username),
            ),
            channel: pick(args.map(|a| &a.channel), section.map(|s| &s.channel)),
            icon_emoji: pick(
                args.map(|a| &a.icon_emoji),
                section.map(|s| &s.icon_emoji),
            ),
            icon_url: pick(args.map(|a| &a.icon_url), section.map(|s| &s.icon_url)),
        }
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Renders a URL without its path, which carries the webhook secret.
fn redact(url: &Url) -> String {
    match url.port() {
        Some(port) => format!("{}://{}:{port}/...", url.scheme(), url.host_str().unwrap_or("")),
        None => format!("{}://{}/...", url.scheme(), url.host_str().unwrap_or("")),
    }
}
