//! `tracing`-backed log sink.

use serde_json::Value;
use stratus_core::{LogLevel, LogRecord, LogSink};

use crate::logging::LogConfig;

/// Emits every record as one `tracing` event under the `stratus` target.
///
/// The whole record is attached as a JSON string in the `record` field; the
/// event message is the record's message (strings verbatim, other values
/// serialized). `fatal` maps to `ERROR`.
#[derive(Debug, Clone)]
pub struct TracingSink {
    service_name: String,
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new("stratus")
    }
}

impl TracingSink {
    /// Creates a sink tagging events with `service_name`.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    /// Creates a sink from logging configuration.
    pub fn from_config(config: &LogConfig) -> Self {
        Self::new(config.service_name.clone())
    }

    /// The service name attached to events.
    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

macro_rules! emit_event {
    ($macro:ident, $service:ident, $source:ident, $payload:ident, $message:ident) => {
        tracing::$macro!(
            target: "stratus",
            service_name = %$service,
            source = %$source,
            record = %$payload,
            "{}",
            $message
        )
    };
}

impl LogSink for TracingSink {
    fn emit(&self, level: LogLevel, record: &LogRecord) {
        let payload = serde_json::to_string(record).unwrap_or_default();
        let message = match &record.message {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        let service = self.service_name.as_str();
        let source = record.source.as_str();

        match level {
            LogLevel::Trace => emit_event!(trace, service, source, payload, message),
            LogLevel::Debug => emit_event!(debug, service, source, payload, message),
            LogLevel::Info => emit_event!(info, service, source, payload, message),
            LogLevel::Warn => emit_event!(warn, service, source, payload, message),
            LogLevel::Error | LogLevel::Fatal => {
                emit_event!(error, service, source, payload, message);
            }
        }
    }
}
