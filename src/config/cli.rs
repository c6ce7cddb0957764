//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::defaults;

/// samhook: post messages to Slack-style incoming webhooks
///
/// Sends a text message (optionally with one attachment) and retries
/// transient failures with exponential backoff.
#[derive(Debug, Parser)]
#[command(name = "samhook")]
#[command(version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)] // CLI flags are naturally boolean
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Webhook URL (required for send)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Maximum number of retries after the first attempt
    #[arg(long = "retry-max", global = true)]
    pub retry_max: Option<u32>,

    /// Fixed wait between attempts in seconds (used with --no-backoff)
    #[arg(long = "retry-interval", global = true)]
    pub retry_interval: Option<u64>,

    /// Send once, never retry
    #[arg(long = "no-retry", global = true)]
    pub no_retry: bool,

    /// Wait a fixed interval between attempts instead of backing off
    #[arg(long = "no-backoff", global = true)]
    pub no_backoff: bool,

    /// Disable random jitter on backoff waits
    #[arg(long = "no-jitter", global = true)]
    pub no_jitter: bool,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for samhook
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send a message to the webhook
    Send(SendArgs),

    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = defaults::CONFIG_FILE)]
        output: PathBuf,
    },
}

/// Message options for the `send` subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct SendArgs {
    /// Message text
    #[arg(long)]
    pub text: String,

    /// Display name overriding the webhook default
    #[arg(long)]
    pub username: Option<String>,

    /// Channel overriding the webhook default
    #[arg(long)]
    pub channel: Option<String>,

    /// Emoji used as the avatar, e.g. ":ghost:"
    #[arg(long = "icon-emoji")]
    pub icon_emoji: Option<String>,

    /// Image URL used as the avatar
    #[arg(long = "icon-url")]
    pub icon_url: Option<String>,

    /// Attachment color: good, warning, danger, or a hex value
    #[arg(long)]
    pub color: Option<String>,

    /// Attachment title
    #[arg(long)]
    pub title: Option<String>,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Command::Init { .. })
    }

    /// Returns the send options, if this is the send command.
    #[must_use]
    pub const fn send_args(&self) -> Option<&SendArgs> {
        match &self.command {
            Command::Send(args) => Some(args),
            Command::Init { .. } => None,
        }
    }
}
