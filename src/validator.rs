//! Webhook URL validation.

use thiserror::Error;
use url::Url;

/// Reason a webhook URL was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    /// The URL string was empty.
    #[error("webhook URL cannot be empty")]
    Empty,

    /// The URL could not be parsed.
    #[error("invalid URL format: {0}")]
    Parse(#[from] url::ParseError),

    /// The scheme was neither `http` nor `https`.
    #[error("URL scheme must be http or https, got: {0}")]
    UnsupportedScheme(String),

    /// The URL has no host component.
    #[error("URL must have a host")]
    MissingHost,
}

/// Parses and checks a webhook URL.
///
/// # Errors
///
/// Returns [`UrlError`] if the string is empty, unparseable, uses a scheme
/// other than http/https, or lacks a host.
///
/// # Example
///
/// ```
/// use samhook::validator::{UrlError, validate_webhook_url};
///
/// assert!(validate_webhook_url("https://hooks.slack.com/services/T0/B0/X").is_ok());
/// assert_eq!(
///     validate_webhook_url("ftp://example.com"),
///     Err(UrlError::UnsupportedScheme("ftp".to_string()))
/// );
/// ```
pub fn validate_webhook_url(webhook_url: &str) -> Result<Url, UrlError> {
    if webhook_url.is_empty() {
        return Err(UrlError::Empty);
    }

    let url = Url::parse(webhook_url)?;

    // url lowercases the scheme while parsing
    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlError::UnsupportedScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}
