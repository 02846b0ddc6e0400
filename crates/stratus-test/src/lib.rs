//! # Stratus Test
//!
//! Test utilities for Stratus handlers. Everything runs in-process: no
//! serverless runtime and no cloud account are needed.
//!
//! - [`fixtures`] - raw API, queue and bus events in the shape a runtime delivers
//! - [`MockProvider`] - a lenient provider that understands those fixtures
//! - [`MemorySink`] - a log sink that keeps every record for assertions
//! - [`OrderLog`] - records which middleware phases ran, and in what order
//!
//! ## Example
//!
//! ```
//! use stratus_core::{LogLevel, Logger};
//! use stratus_test::MemorySink;
//! use std::sync::Arc;
//!
//! let sink = Arc::new(MemorySink::new());
//! let logger = Logger::new(sink.clone(), Arc::default(), Arc::default());
//! logger.info("hello");
//!
//! assert_eq!(sink.count(LogLevel::Info), 1);
//! assert_eq!(sink.messages(), vec![serde_json::json!("hello")]);
//! ```

#![doc(html_root_url = "https://docs.rs/stratus-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod fixtures;
mod order;
mod provider;
mod sink;

pub use order::OrderLog;
pub use provider::MockProvider;
pub use sink::MemorySink;
