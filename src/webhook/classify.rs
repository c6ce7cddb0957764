//! Error classification: network causes, HTTP statuses, and retryability.

use std::error::Error as StdError;
use std::io;

use http::StatusCode;

use super::error::{BoxError, ErrorCategory, ErrorCode, HttpError, WebhookError};

/// Derives a network error code by walking the cause chain.
///
/// A timeout anywhere in the chain wins over everything else, so a
/// connection error wrapping an operation-level timeout is still a timeout.
/// A missing or unrecognized cause defaults to
/// [`ErrorCode::NetworkConnection`].
#[must_use]
pub fn classify_network_cause(cause: Option<&(dyn StdError + 'static)>) -> ErrorCode {
    let Some(cause) = cause else {
        return ErrorCode::NetworkConnection;
    };

    if chain(cause).any(is_timeout) {
        ErrorCode::NetworkTimeout
    } else if chain(cause).any(is_dns) {
        ErrorCode::NetworkDns
    } else {
        ErrorCode::NetworkConnection
    }
}

/// Maps a non-success HTTP status to an API error code.
///
/// Unmapped statuses, including client errors such as 400, fall into
/// [`ErrorCode::ApiServerError`]. This mirrors the historical mapping;
/// retryability is decided on the status itself, not on this code.
#[must_use]
pub fn code_for_status(status: StatusCode) -> ErrorCode {
    match status.as_u16() {
        401 => ErrorCode::ApiUnauthorized,
        403 => ErrorCode::ApiForbidden,
        404 => ErrorCode::ApiNotFound,
        429 => ErrorCode::ApiRateLimit,
        _ => ErrorCode::ApiServerError,
    }
}

/// Converts an arbitrary error into a [`WebhookError`].
///
/// A [`WebhookError`] is returned unchanged. A transport [`HttpError`] becomes
/// a network error. Anything else is wrapped with category
/// [`ErrorCategory::Unknown`].
#[must_use]
pub fn classify_generic(target: &str, err: BoxError) -> WebhookError {
    let err = match err.downcast::<WebhookError>() {
        Ok(webhook) => return *webhook,
        Err(other) => other,
    };

    if err.is::<HttpError>() {
        return WebhookError::network(target, err);
    }

    WebhookError::unknown(target, err)
}

/// Extension trait for checking if an error is retryable.
///
/// Determines whether an error represents a transient failure that
/// warrants another attempt.
pub trait IsRetryable {
    /// Returns true if the error is potentially transient and should be retried.
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for WebhookError {
    fn is_retryable(&self) -> bool {
        match self.category() {
            ErrorCategory::Network => true,
            // 5xx and rate limiting; every other status is the caller's problem
            ErrorCategory::Api => self
                .status_code()
                .is_some_and(|s| s.as_u16() >= 500 || s == StatusCode::TOO_MANY_REQUESTS),
            ErrorCategory::Serialization | ErrorCategory::Unknown => false,
        }
    }
}

impl IsRetryable for HttpError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(_) | Self::Dns(_) | Self::Timeout => true,
            // URL errors are configuration issues, not transient
            Self::InvalidUrl(_) => false,
        }
    }
}

/// Returns true if any error in the chain reports a name-resolution failure.
pub(super) fn is_dns_failure(err: &(dyn StdError + 'static)) -> bool {
    chain(err).any(is_dns)
}

fn chain<'a>(
    err: &'a (dyn StdError + 'static),
) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(Some(err), |&e| e.source())
}

fn is_timeout(err: &(dyn StdError + 'static)) -> bool {
    if let Some(http) = err.downcast_ref::<HttpError>() {
        return matches!(http, HttpError::Timeout);
    }
    if let Some(req) = err.downcast_ref::<reqwest::Error>() {
        return req.is_timeout();
    }
    if let Some(io) = err.downcast_ref::<io::Error>() {
        return io.kind() == io::ErrorKind::TimedOut;
    }
    err.is::<tokio::time::error::Elapsed>()
}

fn is_dns(err: &(dyn StdError + 'static)) -> bool {
    if let Some(http) = err.downcast_ref::<HttpError>() {
        return matches!(http, HttpError::Dns(_));
    }
    // hyper's resolver does not expose a typed error; match its wording
    let text = err.to_string().to_ascii_lowercase();
    text.contains("dns error")
        || text.contains("failed to lookup address")
        || text.contains("name or service not known")
        || text.contains("no such host")
}
