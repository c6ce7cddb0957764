//! Per-request logging sink.
//!
//! Every send attempt is reported once to the process-wide [`RequestLogger`].
//! The default sink discards everything; [`set_logger`] and
//! [`set_logger_writer`] replace it at any time. A replacement is a single
//! `Arc` swap, so concurrent senders observe either the old or the new sink,
//! never a partially built one.

use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use crate::webhook::WebhookError;

/// Sink receiving one call per request attempt.
pub trait RequestLogger: Send + Sync {
    /// Records a finished attempt.
    ///
    /// `outcome` is `Ok(())` on success or the attempt's error.
    fn log_request(
        &self,
        url: &str,
        method: &http::Method,
        duration: Duration,
        outcome: Result<(), &WebhookError>,
    );
}

/// Sink that discards every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl RequestLogger for NoopLogger {
    fn log_request(&self, _: &str, _: &http::Method, _: Duration, _: Result<(), &WebhookError>) {}
}

/// Sink that forwards records to `tracing`.
///
/// Successes are emitted at DEBUG, failures at WARN.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl RequestLogger for TracingLogger {
    fn log_request(
        &self,
        url: &str,
        method: &http::Method,
        duration: Duration,
        outcome: Result<(), &WebhookError>,
    ) {
        match outcome {
            Ok(()) => tracing::debug!(%method, url, ?duration, "Webhook request succeeded"),
            Err(e) => tracing::warn!(
                %method,
                url,
                ?duration,
                code = %e.code(),
                error = %e,
                "Webhook request failed"
            ),
        }
    }
}

/// Sink writing one line per attempt to any [`Write`] implementation.
///
/// Format: `[samhook] POST <url> - success|error - duration: <d>`, followed
/// by `[samhook] error: <e>` for failures. Write errors are ignored.
#[derive(Debug)]
pub struct WriterLogger<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterLogger<W> {
    /// Wraps a writer.
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> RequestLogger for WriterLogger<W> {
    fn log_request(
        &self,
        url: &str,
        method: &http::Method,
        duration: Duration,
        outcome: Result<(), &WebhookError>,
    ) {
        let status = if outcome.is_ok() { "success" } else { "error" };
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let _ = writeln!(
            writer,
            "[samhook] {method} {url} - {status} - duration: {duration:?}"
        );
        if let Err(e) = outcome {
            let _ = writeln!(writer, "[samhook] error: {e}");
        }
        let _ = writer.flush();
    }
}

static LOGGER: RwLock<Option<Arc<dyn RequestLogger>>> = RwLock::new(None);

/// Replaces the process-wide sink. `None` restores the no-op sink.
pub fn set_logger(logger: Option<Arc<dyn RequestLogger>>) {
    *LOGGER.write().unwrap_or_else(PoisonError::into_inner) = logger;
}

/// Installs a [`WriterLogger`] around `writer`. `None` restores the no-op sink.
pub fn set_logger_writer<W>(writer: Option<W>)
where
    W: Write + Send + 'static,
{
    set_logger(writer.map(|w| Arc::new(WriterLogger::new(w)) as Arc<dyn RequestLogger>));
}

/// Returns the current process-wide sink.
#[must_use]
pub fn logger() -> Arc<dyn RequestLogger> {
    LOGGER
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .unwrap_or_else(|| Arc::new(NoopLogger))
}

#[cfg(test)]
#[path = "logger_tests.rs"]
mod tests;
