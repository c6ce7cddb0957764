//! Process plumbing for the samhook binary: exit codes, config hints and
//! the stderr tracing subscriber.

use samhook::config::{ConfigError, field};
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;

/// Exit codes reported by `samhook`.
pub mod exit_code {
    use std::process::ExitCode;

    /// The message was delivered, or `init` wrote its template (0).
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Configuration could not be loaded or validated (1).
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// The send failed after retries or was cancelled by a signal (2).
    ///
    /// `ExitCode::from` is not `const`, hence a function.
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(2)
    }
}

const INIT_HINT: &str = "Run 'samhook init' to generate a configuration template.";

/// Returns a follow-up hint for a configuration error, if one applies.
pub fn config_hint(error: &ConfigError) -> Option<&'static str> {
    match error {
        ConfigError::MissingRequired { field: f, .. } if *f == field::URL => Some(INIT_HINT),
        ConfigError::FileRead { .. } => Some(INIT_HINT),
        ConfigError::InvalidUrl { .. } => Some(
            "Webhook URLs must be absolute http(s) URLs with a host, \
             e.g. https://hooks.slack.com/services/T000/B000/XXXX",
        ),
        ConfigError::InvalidDuration { field: f, .. } if *f == field::TIMEOUT => {
            Some("Pass --timeout or set webhook.timeout as whole seconds, at least 1.")
        }
        ConfigError::InvalidRetry(_) => Some(
            "Check the [retry] section: intervals are whole seconds above 0, \
             max_interval must not be below initial_interval and multiplier must be >= 1.0. \
             Use --no-retry to send once.",
        ),
        ConfigError::TomlParse(_) => {
            Some("Only [webhook], [message] and [retry] keys from 'samhook init' are accepted.")
        }
        _ => None,
    }
}

/// Prints the hint for `error` to stderr.
pub fn print_config_hint(error: &ConfigError) {
    if let Some(hint) = config_hint(error) {
        eprintln!("\n{hint}");
    }
}

/// Installs the stderr subscriber; `-v` raises the default level to DEBUG.
///
/// `RUST_LOG` still wins over the default directive.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
