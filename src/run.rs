//! Application execution logic.
//!
//! Builds the message from validated config and send options, then delivers
//! it with retry until it succeeds, fails for good, or Ctrl+C arrives.

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::signal;

use samhook::config::{MessageDefaults, SendArgs, ValidatedConfig};
use samhook::logger::{self, TracingLogger};
use samhook::message::{self, Attachment, Message};
use samhook::time::Sleeper;
use samhook::validator::UrlError;
use samhook::webhook::{
    ClientConfig, HttpClient, ReqwestClient, RetryPolicy, WebhookClient, WebhookError,
};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The configured URL was rejected by the client.
    #[error("Invalid webhook URL: {0}")]
    InvalidUrl(#[from] UrlError),

    /// Delivery failed after all attempts, or was cancelled.
    #[error("Failed to send message: {0}")]
    Send(#[from] WebhookError),
}

/// Sends one message as described by `config` and `args`.
///
/// Request attempts are reported through `tracing`.
///
/// # Errors
///
/// Returns an error if the client cannot be built or delivery fails.
///
/// # Coverage Note
///
/// This function is excluded from coverage because it requires:
/// - A reachable webhook endpoint
/// - Real async runtime with signal handling
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig, args: &SendArgs) -> Result<(), RunError> {
    logger::set_logger(Some(Arc::new(TracingLogger)));

    let http = ReqwestClient::from_config(ClientConfig::new().with_timeout(config.timeout));
    let client = WebhookClient::new(http, config.url.as_str())?;
    let message = build_message(&config.message, args);

    deliver(&client, &message, &config.retry_policy, shutdown_signal()).await
}

/// Delivers `message`, giving up early when `cancel` completes.
async fn deliver<H, S, C>(
    client: &WebhookClient<H, S>,
    message: &Message,
    policy: &RetryPolicy,
    cancel: C,
) -> Result<(), RunError>
where
    H: HttpClient,
    S: Sleeper,
    C: Future<Output = ()>,
{
    tracing::debug!(
        max_attempts = policy.max_attempts(),
        backoff = policy.backoff.is_some(),
        "Sending message"
    );

    match client.send_with_retry_until(message, policy, cancel).await {
        Ok(()) => {
            tracing::info!("Message delivered");
            Ok(())
        }
        Err(e) => {
            tracing::debug!("{}", e.detailed_message());
            Err(e.into())
        }
    }
}

/// Builds the outgoing message.
///
/// A color or title adds a single attachment carrying them, with the text as
/// its fallback.
fn build_message(defaults: &MessageDefaults, args: &SendArgs) -> Message {
    let mut msg = Message {
        text: args.text.clone(),
        username: defaults.username.clone(),
        channel: defaults.channel.clone(),
        icon_emoji: defaults.icon_emoji.clone(),
        icon_url: defaults.icon_url.clone(),
        ..Message::default()
    };

    if args.color.is_some() || args.title.is_some() {
        msg.add_attachment(Attachment {
            fallback: args.text.clone(),
            color: args.color.as_deref().map(resolve_color).unwrap_or_default(),
            title: args.title.clone().unwrap_or_default(),
            ..Attachment::default()
        });
    }

    msg
}

/// Maps the named colors to their hex values; anything else passes through.
fn resolve_color(color: &str) -> String {
    match color.to_ascii_lowercase().as_str() {
        "good" => message::GOOD.to_string(),
        "warning" => message::WARNING.to_string(),
        "danger" => message::DANGER.to_string(),
        _ => color.to_string(),
    }
}

/// Returns a future that completes when a shutdown signal is received.
///
/// If a handler cannot be installed, that signal source never fires.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("Shutdown signal received, cancelling send");
}
