//! Configuration layer for samhook.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`], [`SendArgs`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! The webhook `url` has no default and must come from the CLI or the file.
//!
//! # Boolean Flag Semantics
//!
//! `--no-retry`, `--no-backoff` and `--no-jitter` only disable. A feature
//! turned off in TOML (`enabled`, `backoff`, `jitter` set to `false`) stays
//! off regardless of the CLI.
//!
//! # TOML-Only Options
//!
//! The backoff shape (`retry.initial_interval`, `retry.max_interval`,
//! `retry.multiplier`) is only configurable from the file.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod cli_tests;

pub use cli::{Cli, Command, SendArgs};
pub use error::{ConfigError, field};
pub use toml::{MessageSection, RetrySection, TomlConfig, WebhookSection, default_config_template};
pub use validated::{MessageDefaults, ValidatedConfig, write_default_config};
