//! Production HTTP transport using reqwest.

use std::time::Duration;

use super::classify::is_dns_failure;
use super::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Default per-request timeout (10 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Which reqwest client carries the requests.
#[derive(Debug, Clone, Default)]
pub enum Transport {
    /// A fresh `reqwest::Client` with default settings.
    #[default]
    Default,
    /// A caller-configured client (proxies, TLS roots, pooling, ...).
    Custom(reqwest::Client),
}

/// Transport configuration for [`ReqwestClient`].
///
/// The timeout is applied to every request, including requests sent through
/// a [`Transport::Custom`] client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Per-request timeout covering connect, send and body read.
    pub timeout: Duration,
    /// Underlying client.
    pub transport: Transport,
}

impl ClientConfig {
    /// Creates a configuration with the default timeout and transport.
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            transport: Transport::Default,
        }
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Uses a caller-configured reqwest client.
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.transport = Transport::Custom(client);
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Production HTTP client using reqwest.
///
/// A thin wrapper around `reqwest::Client` that implements [`HttpClient`]
/// and maps reqwest failures onto [`HttpError`].
///
/// # Example
///
/// ```no_run
/// use samhook::webhook::{ClientConfig, HttpClient, HttpRequest, ReqwestClient};
/// use std::time::Duration;
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ReqwestClient::from_config(ClientConfig::new().with_timeout(Duration::from_secs(5)));
/// let url = Url::parse("https://hooks.example.com/services/T000/B000/XXXX")?;
/// let request = HttpRequest::post_json(url, br#"{"text":"hello"}"#.to_vec());
/// let response = client.request(request).await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
    timeout: Duration,
}

impl ReqwestClient {
    /// Creates a client with the default timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(ClientConfig::new())
    }

    /// Creates a client from an explicit configuration.
    #[must_use]
    pub fn from_config(config: ClientConfig) -> Self {
        let inner = match config.transport {
            Transport::Default => reqwest::Client::new(),
            Transport::Custom(client) => client,
        };

        Self {
            inner,
            timeout: config.timeout,
        }
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = self
            .inner
            .request(req.method, req.url.as_str())
            .timeout(self.timeout)
            .body(req.body);

        for (name, value) in &req.headers {
            builder = builder.header(name, value);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?.to_vec();

        Ok(HttpResponse::new(status, body))
    }
}

fn map_reqwest_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else if e.is_builder() {
        HttpError::InvalidUrl(e.to_string())
    } else if is_dns_failure(&e) {
        HttpError::Dns(Box::new(e))
    } else {
        HttpError::Connection(Box::new(e))
    }
}
