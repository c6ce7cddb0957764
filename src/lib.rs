//! samhook: Slack-style incoming webhook client
//!
//! A library for posting chat messages (text, attachments, fields) to
//! incoming-webhook endpoints, with structured error classification and
//! retry with exponential backoff.

pub mod config;
pub mod logger;
pub mod message;
pub mod time;
pub mod validator;
pub mod webhook;
