//! Webhook layer for posting messages to incoming-webhook endpoints.
//!
//! This module provides types and traits for:
//! - Structured errors and their taxonomy ([`WebhookError`], [`ErrorCategory`], [`ErrorCode`])
//! - Classifying raw failures ([`classify_generic`], [`IsRetryable`])
//! - Backoff and retry ([`ExponentialBackoff`], [`RetryPolicy`], [`execute_with_retry`])
//! - Abstracting HTTP clients ([`HttpClient`], [`HttpRequest`], [`HttpResponse`])
//! - Production HTTP client implementation ([`ReqwestClient`], [`ClientConfig`])
//! - Send orchestration ([`WebhookClient`])

mod backoff;
mod classify;
mod client;
mod error;
mod http;
mod retry;
mod sender;

#[cfg(test)]
mod client_tests;
#[cfg(test)]
mod sender_tests;

pub use backoff::ExponentialBackoff;
pub use classify::{IsRetryable, classify_generic, classify_network_cause, code_for_status};
pub use client::{ClientConfig, DEFAULT_TIMEOUT, ReqwestClient, Transport};
pub use error::{BoxError, ErrorCategory, ErrorCode, HttpError, WebhookError};
pub use http::{HttpClient, HttpRequest, HttpResponse};
pub use retry::{AsWebhookError, RetryPolicy, execute_with_retry, execute_with_retry_until};
pub use sender::WebhookClient;
