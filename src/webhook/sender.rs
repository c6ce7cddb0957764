//! Send orchestration: encode, POST, map the outcome, retry.

use std::future::Future;
use std::time::Instant;

use crate::logger;
use crate::message::Message;
use crate::time::{Sleeper, TokioSleeper};
use crate::validator::{UrlError, validate_webhook_url};

use super::retry::{execute_with_retry, execute_with_retry_until};
use super::{HttpClient, HttpRequest, ReqwestClient, RetryPolicy, WebhookError};

/// Client for one incoming-webhook URL.
///
/// Each send performs one POST of a JSON payload. Any status other than
/// `200 OK` becomes an API error; transport failures become network errors.
/// Every attempt is reported to the process-wide
/// [`RequestLogger`](crate::logger::RequestLogger).
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation (defaults to [`ReqwestClient`])
/// - `S`: The sleeper used between retries (defaults to [`TokioSleeper`])
///
/// # Example
///
/// ```no_run
/// use samhook::message::Message;
/// use samhook::webhook::{RetryPolicy, WebhookClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = WebhookClient::with_default_transport("https://hooks.slack.com/services/T0/B0/XXXX")?;
/// client
///     .send_with_retry(&Message::text("Backup completed"), &RetryPolicy::default())
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct WebhookClient<H = ReqwestClient, S = TokioSleeper> {
    client: H,
    sleeper: S,
    url: url::Url,
}

impl WebhookClient<ReqwestClient, TokioSleeper> {
    /// Creates a client using [`ReqwestClient`] with its default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`UrlError`] if `url` is not a valid http(s) URL.
    pub fn with_default_transport(url: &str) -> Result<Self, UrlError> {
        Self::new(ReqwestClient::new(), url)
    }
}

impl<H> WebhookClient<H, TokioSleeper> {
    /// Creates a client for `url` using the given transport.
    ///
    /// # Errors
    ///
    /// Returns [`UrlError`] if `url` is not a valid http(s) URL.
    pub fn new(client: H, url: &str) -> Result<Self, UrlError> {
        Ok(Self {
            client,
            sleeper: TokioSleeper,
            url: validate_webhook_url(url)?,
        })
    }
}

impl<H, S> WebhookClient<H, S> {
    /// Sets a custom sleeper for retry delays.
    ///
    /// This is primarily useful for testing to avoid actual delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> WebhookClient<H, S2> {
        WebhookClient {
            client: self.client,
            sleeper,
            url: self.url,
        }
    }

    /// Returns the validated webhook URL.
    #[must_use]
    pub const fn url(&self) -> &url::Url {
        &self.url
    }
}

impl<H: HttpClient, S: Sleeper> WebhookClient<H, S> {
    /// Sends `message` once.
    ///
    /// # Errors
    ///
    /// Returns a serialization, network, or API [`WebhookError`].
    pub async fn send(&self, message: &Message) -> Result<(), WebhookError> {
        let body = encode(message)?;
        self.post(body).await
    }

    /// Sends an already-encoded JSON body once.
    ///
    /// # Errors
    ///
    /// Returns a network or API [`WebhookError`].
    pub async fn send_raw(&self, body: impl Into<Vec<u8>>) -> Result<(), WebhookError> {
        self.post(body.into()).await
    }

    /// Sends `message` once, aborting when `cancel` completes first.
    ///
    /// # Errors
    ///
    /// Returns the attempt's error, or a
    /// [`NetworkCancelled`](super::ErrorCode::NetworkCancelled) error.
    pub async fn send_until<C>(&self, message: &Message, cancel: C) -> Result<(), WebhookError>
    where
        C: Future<Output = ()>,
    {
        self.send_with_retry_until(message, &RetryPolicy::no_retry(), cancel)
            .await
    }

    /// Sends `message`, retrying transient failures per `policy`.
    ///
    /// The payload is encoded once; a serialization failure is never retried.
    ///
    /// # Errors
    ///
    /// Returns the last attempt's [`WebhookError`].
    pub async fn send_with_retry(
        &self,
        message: &Message,
        policy: &RetryPolicy,
    ) -> Result<(), WebhookError> {
        let body = encode(message)?;
        execute_with_retry(policy, &self.sleeper, || self.post(body.clone())).await
    }

    /// Like [`send_with_retry`](Self::send_with_retry), aborting when `cancel`
    /// completes, whether mid-request or between attempts.
    ///
    /// # Errors
    ///
    /// Returns the last attempt's error, or a
    /// [`NetworkCancelled`](super::ErrorCode::NetworkCancelled) error.
    pub async fn send_with_retry_until<C>(
        &self,
        message: &Message,
        policy: &RetryPolicy,
        cancel: C,
    ) -> Result<(), WebhookError>
    where
        C: Future<Output = ()>,
    {
        let body = encode(message)?;
        execute_with_retry_until(policy, &self.sleeper, self.url.as_str(), cancel, || {
            self.post(body.clone())
        })
        .await
    }

    /// Performs one POST and reports it to the request logger.
    async fn post(&self, body: Vec<u8>) -> Result<(), WebhookError> {
        let request = HttpRequest::post_json(self.url.clone(), body);
        let method = request.method.clone();

        tracing::debug!(url = %self.url, "Sending webhook request");
        let started = Instant::now();
        let outcome = self.execute(request).await;
        let elapsed = started.elapsed();

        logger::logger().log_request(self.url.as_str(), &method, elapsed, outcome.as_ref().copied());
        outcome
    }

    /// Executes a single request and maps the response.
    async fn execute(&self, request: HttpRequest) -> Result<(), WebhookError> {
        let target = self.url.as_str();
        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| WebhookError::network(target, e))?;

        if response.is_ok() {
            return Ok(());
        }

        Err(WebhookError::api(
            target,
            response.status,
            response.body_lossy(),
        ))
    }
}

fn encode(message: &Message) -> Result<Vec<u8>, WebhookError> {
    serde_json::to_vec(message).map_err(WebhookError::serialization)
}
