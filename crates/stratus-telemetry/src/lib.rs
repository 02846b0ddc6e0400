//! Logging and metrics for Stratus.
//!
//! - **Logging**: [`init_logging`] installs a JSON or pretty `tracing`
//!   formatter; [`TracingSink`] is the default [`LogSink`](stratus_core::LogSink)
//!   handlers emit their structured records to.
//! - **Metrics**: [`record_invocation`] counts invocations by kind and
//!   outcome and observes their duration through the `metrics` facade.

#![doc(html_root_url = "https://docs.rs/stratus-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;
pub mod metrics;
mod sink;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig};
pub use self::metrics::{describe_metrics, record_invocation, InvocationOutcome};
pub use sink::TracingSink;

/// Result type for telemetry setup.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
