//! # Stratus Core
//!
//! Core types and contracts for the Stratus serverless event adapter.
//!
//! This crate provides the uniform model every provider translates into and
//! out of:
//!
//! - [`ApiRequest`] / [`ApiResponse`] - HTTP API request view and mutable response builder
//! - [`QueueEvent`] / [`QueueResponse`] - queue message view and body-only response
//! - [`BusEvent`] - pub/sub notification view (no response channel)
//! - [`ApiContext`], [`QueueContext`], [`BusContext`] - per-invocation bundles
//! - [`Provider`] - the translation contract implemented once per platform
//! - [`Logger`] / [`LogSink`] - structured log records attached to each context
//!
//! Nothing in this crate executes middleware; see `stratus-middleware` for the
//! phase runner and `stratus` for the handlers.

#![doc(html_root_url = "https://docs.rs/stratus-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod api;
mod body;
mod bus;
mod context;
mod error;
mod log;
mod provider;
mod queue;

pub use api::{ApiRequest, ApiRequestBuilder, ApiResponse, ApiResponseExport};
pub use body::{decode_body, parse_cookies};
pub use bus::BusEvent;
pub use context::{ApiContext, BusContext, EventKind, InvocationContext, QueueContext};
pub use error::{BoxError, ProviderError, ProviderResult};
pub use log::{LogLevel, LogRecord, LogSink, Logger, NoopSink};
pub use provider::{ApiTranslator, BusTranslator, Provider, QueueTranslator};
pub use queue::{QueueEvent, QueueResponse};

/// Re-exported so callers can pass typed MIME constants to
/// [`ApiResponse::content_type`].
pub use mime;

/// A JSON object with insertion-ordered keys.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;
