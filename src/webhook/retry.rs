//! Retry policy and the retry control loop.

use std::future::Future;
use std::time::Duration;

use crate::time::Sleeper;

use super::backoff::ExponentialBackoff;
use super::classify::IsRetryable;
use super::error::{BoxError, WebhookError};

/// Configuration for retrying a failed send.
///
/// `max_retries` counts retries, not attempts: a value of 0 sends once,
/// a value of 3 sends at most four times.
///
/// When `backoff` is set it decides every wait; otherwise each wait is
/// `base_interval`.
///
/// # Defaults
///
/// - `max_retries`: 3
/// - `base_interval`: 1 second
/// - `backoff`: [`ExponentialBackoff::default`] (1s doubling to 30s, jittered)
///
/// # Example
///
/// ```
/// use samhook::webhook::{ExponentialBackoff, RetryPolicy};
/// use std::time::Duration;
///
/// // Fixed half-second waits, up to five retries
/// let fixed = RetryPolicy::new()
///     .with_max_retries(5)
///     .with_base_interval(Duration::from_millis(500))
///     .without_backoff();
///
/// // Exponential backoff without jitter
/// let exponential = RetryPolicy::new()
///     .with_backoff(ExponentialBackoff::new().with_jitter(false));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,

    /// Fixed wait used when no backoff is configured.
    pub base_interval: Duration,

    /// Optional exponential backoff overriding `base_interval`.
    pub backoff: Option<ExponentialBackoff>,
}

impl RetryPolicy {
    /// Default maximum retries.
    pub const DEFAULT_MAX_RETRIES: u32 = 3;

    /// Default fixed interval (1 second).
    pub const DEFAULT_BASE_INTERVAL: Duration = Duration::from_secs(1);

    /// Creates a retry policy with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: Self::DEFAULT_MAX_RETRIES,
            base_interval: Self::DEFAULT_BASE_INTERVAL,
            backoff: Some(ExponentialBackoff::new()),
        }
    }

    /// Creates a policy that never retries.
    #[must_use]
    pub const fn no_retry() -> Self {
        Self {
            max_retries: 0,
            base_interval: Self::DEFAULT_BASE_INTERVAL,
            backoff: None,
        }
    }

    /// Sets the maximum number of retries.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the fixed interval used without backoff.
    ///
    /// Zero is supported (useful for testing with [`InstantSleeper`])
    /// but creates a tight retry loop in production.
    ///
    /// [`InstantSleeper`]: crate::time::InstantSleeper
    #[must_use]
    pub const fn with_base_interval(mut self, interval: Duration) -> Self {
        self.base_interval = interval;
        self
    }

    /// Sets the exponential backoff.
    #[must_use]
    pub fn with_backoff(mut self, backoff: ExponentialBackoff) -> Self {
        self.backoff = Some(backoff);
        self
    }

    /// Removes the backoff so every wait is `base_interval`.
    #[must_use]
    pub fn without_backoff(mut self) -> Self {
        self.backoff = None;
        self
    }

    /// Returns the wait after `attempt` failed attempts have been made
    /// (0 = wait before the first retry).
    #[must_use]
    pub fn interval_for(&self, attempt: u32) -> Duration {
        self.backoff
            .as_ref()
            .map_or(self.base_interval, |b| b.next_interval(attempt))
    }

    /// Returns true if another attempt is allowed after retry number `retry`
    /// (0 = the initial attempt just failed).
    #[must_use]
    pub const fn should_retry(&self, retry: u32) -> bool {
        retry < self.max_retries
    }

    /// Upper bound on how many times the attempt function is invoked.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Access to the structured error inside an attempt failure, if any.
///
/// Failures that do not carry a [`WebhookError`] are never retried.
pub trait AsWebhookError {
    /// Returns the structured error, or `None` for unrecognized failures.
    fn as_webhook_error(&self) -> Option<&WebhookError>;
}

impl AsWebhookError for WebhookError {
    fn as_webhook_error(&self) -> Option<&WebhookError> {
        Some(self)
    }
}

impl AsWebhookError for BoxError {
    fn as_webhook_error(&self) -> Option<&WebhookError> {
        self.downcast_ref::<WebhookError>()
    }
}

/// Runs `attempt_fn` until it succeeds, fails terminally, or the policy is exhausted.
///
/// - Success returns immediately.
/// - A failure without a [`WebhookError`] returns immediately.
/// - A non-retryable [`WebhookError`] returns immediately.
/// - A retryable one sleeps for [`RetryPolicy::interval_for`] and tries again,
///   up to [`RetryPolicy::max_attempts`] invocations in total.
///
/// The returned error is always the one produced by the last attempt.
///
/// # Errors
///
/// Returns the last attempt's error when no attempt succeeded.
pub async fn execute_with_retry<T, E, F, Fut, S>(
    policy: &RetryPolicy,
    sleeper: &S,
    mut attempt_fn: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: AsWebhookError,
    S: Sleeper,
{
    let mut retry: u32 = 0;

    loop {
        let err = match attempt_fn().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        let Some(webhook_err) = err.as_webhook_error() else {
            tracing::debug!("Attempt failed with an unclassified error, not retrying");
            return Err(err);
        };

        if !webhook_err.is_retryable() {
            tracing::debug!(code = %webhook_err.code(), "Attempt failed with a non-retryable error");
            return Err(err);
        }

        if !policy.should_retry(retry) {
            tracing::debug!(
                attempts = retry + 1,
                code = %webhook_err.code(),
                "Retries exhausted"
            );
            return Err(err);
        }

        let delay = policy.interval_for(retry);
        tracing::warn!(
            attempt = retry + 1,
            code = %webhook_err.code(),
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "Attempt failed, retrying"
        );
        sleeper.sleep(delay).await;
        retry += 1;
    }
}

/// Like [`execute_with_retry`], but aborts as soon as `cancel` completes.
///
/// Cancellation is observed both while an attempt is in flight and during
/// the wait between attempts. It surfaces as
/// [`ErrorCode::NetworkCancelled`](super::ErrorCode::NetworkCancelled) for `target`.
///
/// # Errors
///
/// Returns the last attempt's error, or the cancellation error.
pub async fn execute_with_retry_until<T, E, F, Fut, S, C>(
    policy: &RetryPolicy,
    sleeper: &S,
    target: &str,
    cancel: C,
    attempt_fn: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: AsWebhookError + From<WebhookError>,
    S: Sleeper,
    C: Future<Output = ()>,
{
    tokio::select! {
        biased;

        () = cancel => {
            tracing::info!(target_url = target, "Send cancelled");
            Err(E::from(WebhookError::cancelled(target)))
        }

        result = execute_with_retry(policy, sleeper, attempt_fn) => result,
    }
}
