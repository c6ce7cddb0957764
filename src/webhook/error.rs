//! Error types for webhook operations.
//!
//! [`HttpError`] describes a raw transport failure. [`WebhookError`] is the
//! structured error callers branch on: it carries a category, a fine-grained
//! [`ErrorCode`], and the context of the failed request.

use std::error::Error as StdError;
use std::fmt;

use http::StatusCode;
use thiserror::Error;

use super::classify::{classify_network_cause, code_for_status};

/// Boxed error used for wrapped causes.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Error type for HTTP transport operations.
///
/// Describes what went wrong without dictating recovery strategy.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed (refused, reset, TLS, ...).
    #[error("Connection error: {0}")]
    Connection(#[source] BoxError),

    /// Host name could not be resolved.
    #[error("DNS resolution error: {0}")]
    Dns(#[source] BoxError),

    /// Request timed out.
    ///
    /// The server did not respond within the configured timeout period.
    #[error("Request timed out")]
    Timeout,

    /// The provided URL is invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Top-level failure category. Exactly one applies to every [`WebhookError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Transport-level failure: timeout, DNS, connection refusal, cancellation.
    Network,
    /// The payload could not be encoded.
    Serialization,
    /// The endpoint answered with a non-success status.
    Api,
    /// Anything that did not match the categories above.
    Unknown,
}

impl ErrorCategory {
    /// Returns the lowercase name used in rendered messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Serialization => "serialization",
            Self::Api => "api",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fine-grained error code.
///
/// The string forms returned by [`ErrorCode::as_str`] are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// `NETWORK_TIMEOUT`
    NetworkTimeout,
    /// `NETWORK_DNS`
    NetworkDns,
    /// `NETWORK_CONNECTION`
    NetworkConnection,
    /// `NETWORK_CANCELLED`: the caller's cancellation signal fired.
    NetworkCancelled,
    /// `SERIALIZATION_JSON`
    SerializationJson,
    /// `API_UNAUTHORIZED` (401)
    ApiUnauthorized,
    /// `API_FORBIDDEN` (403)
    ApiForbidden,
    /// `API_NOT_FOUND` (404)
    ApiNotFound,
    /// `API_RATE_LIMIT` (429)
    ApiRateLimit,
    /// `API_SERVER_ERROR` (5xx and every unmapped status)
    ApiServerError,
    /// `unknown`, lower-case like the category name
    Unknown,
}

impl ErrorCode {
    /// Returns the stable string form of the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NetworkTimeout => "NETWORK_TIMEOUT",
            Self::NetworkDns => "NETWORK_DNS",
            Self::NetworkConnection => "NETWORK_CONNECTION",
            Self::NetworkCancelled => "NETWORK_CANCELLED",
            Self::SerializationJson => "SERIALIZATION_JSON",
            Self::ApiUnauthorized => "API_UNAUTHORIZED",
            Self::ApiForbidden => "API_FORBIDDEN",
            Self::ApiNotFound => "API_NOT_FOUND",
            Self::ApiRateLimit => "API_RATE_LIMIT",
            Self::ApiServerError => "API_SERVER_ERROR",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category plus the data that only exists for that category.
#[derive(Debug)]
enum Kind {
    Network,
    Serialization,
    Api { status: StatusCode, body: String },
    Unknown,
}

/// Structured error returned by every send operation.
///
/// Constructed once at the point of failure by one of the factory functions
/// ([`network`](Self::network), [`serialization`](Self::serialization),
/// [`api`](Self::api), [`cancelled`](Self::cancelled),
/// [`unknown`](Self::unknown)) and never mutated afterwards.
///
/// Status code and response body are present if and only if the category
/// is [`ErrorCategory::Api`].
///
/// # Example
///
/// ```
/// use samhook::webhook::{ErrorCategory, ErrorCode, WebhookError};
/// use http::StatusCode;
///
/// let err = WebhookError::api("https://hooks.example.com/x", StatusCode::TOO_MANY_REQUESTS, "slow down");
/// assert_eq!(err.category(), ErrorCategory::Api);
/// assert_eq!(err.code(), ErrorCode::ApiRateLimit);
/// assert_eq!(err.response_body(), Some("slow down"));
/// ```
#[derive(Debug)]
pub struct WebhookError {
    kind: Kind,
    code: ErrorCode,
    message: String,
    target: Option<String>,
    source: Option<BoxError>,
}

impl WebhookError {
    /// Creates a network error, deriving the code from `cause`.
    ///
    /// Timeouts anywhere in the cause chain yield
    /// [`ErrorCode::NetworkTimeout`], name-resolution failures
    /// [`ErrorCode::NetworkDns`], everything else
    /// [`ErrorCode::NetworkConnection`].
    pub fn network(target: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        let cause = cause.into();
        let code = classify_network_cause(Some(cause.as_ref()));
        let message = match code {
            ErrorCode::NetworkTimeout => format!("network timeout: {cause}"),
            ErrorCode::NetworkDns => format!("DNS resolution failed: {cause}"),
            _ => format!("connection failed: {cause}"),
        };

        Self {
            kind: Kind::Network,
            code,
            message,
            target: Some(target.into()),
            source: Some(cause),
        }
    }

    /// Creates a network error with no underlying cause.
    ///
    /// Defaults to [`ErrorCode::NetworkConnection`].
    pub fn network_without_cause(target: impl Into<String>) -> Self {
        Self {
            kind: Kind::Network,
            code: classify_network_cause(None),
            message: "connection failed".to_string(),
            target: Some(target.into()),
            source: None,
        }
    }

    /// Creates the network error reported when the caller cancels a send.
    pub fn cancelled(target: impl Into<String>) -> Self {
        Self {
            kind: Kind::Network,
            code: ErrorCode::NetworkCancelled,
            message: "request cancelled".to_string(),
            target: Some(target.into()),
            source: None,
        }
    }

    /// Creates a serialization error wrapping the encoder failure.
    pub fn serialization(cause: impl Into<BoxError>) -> Self {
        let cause = cause.into();
        Self {
            kind: Kind::Serialization,
            code: ErrorCode::SerializationJson,
            message: format!("serialization error: {cause}"),
            target: None,
            source: Some(cause),
        }
    }

    /// Creates an API error from a non-success response.
    ///
    /// The message is `API returned status <code>`, followed by
    /// `: <body>` when the body is not empty.
    pub fn api(target: impl Into<String>, status: StatusCode, body: impl Into<String>) -> Self {
        let body = body.into();
        let mut message = format!("API returned status {}", status.as_u16());
        if !body.is_empty() {
            message.push_str(": ");
            message.push_str(&body);
        }

        Self {
            kind: Kind::Api { status, body },
            code: code_for_status(status),
            message,
            target: Some(target.into()),
            source: None,
        }
    }

    /// Creates an error of unknown category wrapping `cause`.
    pub fn unknown(target: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        let cause = cause.into();
        Self {
            kind: Kind::Unknown,
            code: ErrorCode::Unknown,
            message: cause.to_string(),
            target: Some(target.into()),
            source: Some(cause),
        }
    }

    /// Overrides the derived code. Intended for use right after construction.
    #[must_use]
    pub const fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = code;
        self
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self.kind {
            Kind::Network => ErrorCategory::Network,
            Kind::Serialization => ErrorCategory::Serialization,
            Kind::Api { .. } => ErrorCategory::Api,
            Kind::Unknown => ErrorCategory::Unknown,
        }
    }

    /// Returns the fine-grained error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Returns the HTTP status for API errors.
    #[must_use]
    pub const fn status_code(&self) -> Option<StatusCode> {
        match self.kind {
            Kind::Api { status, .. } => Some(status),
            _ => None,
        }
    }

    /// Returns the raw response body for API errors.
    #[must_use]
    pub fn response_body(&self) -> Option<&str> {
        match &self.kind {
            Kind::Api { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Returns the human-readable summary.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the endpoint the failed request was sent to.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Returns true for [`ErrorCategory::Network`].
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self.kind, Kind::Network)
    }

    /// Returns true for [`ErrorCategory::Serialization`].
    #[must_use]
    pub const fn is_serialization(&self) -> bool {
        matches!(self.kind, Kind::Serialization)
    }

    /// Returns true for [`ErrorCategory::Api`].
    #[must_use]
    pub const fn is_api(&self) -> bool {
        matches!(self.kind, Kind::Api { .. })
    }

    /// Returns true for [`ErrorCategory::Unknown`].
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self.kind, Kind::Unknown)
    }

    /// Renders a multi-line description, one labelled line per present part.
    #[must_use]
    pub fn detailed_message(&self) -> String {
        use std::fmt::Write as _;

        let mut buf = String::new();
        let _ = writeln!(buf, "Webhook Error [{}]", self.category());
        if let Some(status) = self.status_code() {
            let _ = writeln!(buf, "  Status Code: {}", status.as_u16());
        }
        let _ = writeln!(buf, "  Message: {}", self.message);
        if let Some(target) = &self.target {
            let _ = writeln!(buf, "  URL: {target}");
        }
        if let Some(body) = self.response_body().filter(|b| !b.is_empty()) {
            let _ = writeln!(buf, "  Response: {body}");
        }
        if let Some(source) = &self.source {
            let _ = writeln!(buf, "  Cause: {source}");
        }
        buf
    }
}

impl fmt::Display for WebhookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.category())?;
        if let Some(status) = self.status_code() {
            write!(f, " HTTP {}", status.as_u16())?;
        }
        write!(f, " {}", self.message)?;
        if let Some(target) = self.target.as_deref().filter(|t| !t.is_empty()) {
            write!(f, " (URL: {target})")?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by: {source}")?;
        }
        Ok(())
    }
}

impl StdError for WebhookError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}
