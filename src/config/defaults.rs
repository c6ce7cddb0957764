//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

/// Default per-request timeout in seconds.
pub const TIMEOUT_SECS: u64 = 10;

/// Default maximum number of retries after the first attempt.
pub const RETRY_MAX_RETRIES: u32 = 3;

/// Default fixed wait between attempts in seconds (used without backoff).
pub const RETRY_INTERVAL_SECS: u64 = 1;

/// Default first backoff wait in seconds.
pub const RETRY_INITIAL_INTERVAL_SECS: u64 = 1;

/// Default backoff cap in seconds.
pub const RETRY_MAX_INTERVAL_SECS: u64 = 30;

/// Default retry backoff multiplier.
pub const RETRY_MULTIPLIER: f64 = 2.0;

/// Default output path for `samhook init`.
pub const CONFIG_FILE: &str = "samhook.toml";
