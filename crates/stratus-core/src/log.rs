//! Structured log records and the per-invocation logger.
//!
//! Every context owns a [`Logger`]. It knows which phase is executing (the
//! `source` tag), the raw event, snapshots of the translated request or
//! event, and the static environment metadata. Each call produces a
//! [`LogRecord`] handed to the configured [`LogSink`].
//!
//! Logging never affects control flow. Sinks cannot fail.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::JsonMap;

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Very fine-grained diagnostics.
    Trace,
    /// Debugging information.
    Debug,
    /// Normal operation.
    Info,
    /// Something unexpected that was handled.
    Warn,
    /// A failed invocation or phase.
    Error,
    /// An error that ends the invocation.
    Fatal,
}

impl LogLevel {
    /// Returns the lower-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structured log line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    /// Severity.
    pub level: LogLevel,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Phase tag, e.g. `middleware.before` or `function`.
    pub source: String,
    /// The logged message.
    pub message: Value,
    /// Queue or bus event snapshot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<Value>,
    /// API request snapshot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<Value>,
    /// Exported response snapshot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    /// The untranslated provider event.
    pub raw_event: Value,
    /// Provider and configuration metadata.
    pub environment: JsonMap,
}

/// Destination for log records.
pub trait LogSink: Send + Sync {
    /// Emits one record.
    fn emit(&self, level: LogLevel, record: &LogRecord);
}

/// A sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn emit(&self, _level: LogLevel, _record: &LogRecord) {}
}

/// Per-invocation structured logger.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
    environment: Arc<JsonMap>,
    source: String,
    raw: Arc<Value>,
    event: Option<Value>,
    request: Option<Value>,
    response: Option<Value>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("source", &self.source)
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}

impl Logger {
    /// Source tag used before any phase has started.
    pub const HANDLER_SOURCE: &'static str = "handler";

    /// Creates a logger for one invocation.
    pub fn new(sink: Arc<dyn LogSink>, environment: Arc<JsonMap>, raw: Arc<Value>) -> Self {
        Self {
            sink,
            environment,
            source: Self::HANDLER_SOURCE.to_string(),
            raw,
            event: None,
            request: None,
            response: None,
        }
    }

    /// A logger that discards all records.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(
            Arc::new(NoopSink),
            Arc::new(JsonMap::new()),
            Arc::new(Value::Null),
        )
    }

    /// Attaches a queue or bus event snapshot.
    #[must_use]
    pub fn with_event(mut self, event: Value) -> Self {
        self.event = Some(event);
        self
    }

    /// Attaches an API request snapshot.
    #[must_use]
    pub fn with_request(mut self, request: Value) -> Self {
        self.request = Some(request);
        self
    }

    /// Sets the phase tag for subsequent records.
    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
    }

    /// Returns the current phase tag.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Replaces the response snapshot attached to subsequent records.
    pub fn set_response(&mut self, response: Option<Value>) {
        self.response = response;
    }

    /// Returns the response snapshot attached to records.
    pub fn response(&self) -> Option<&Value> {
        self.response.as_ref()
    }

    /// Returns the environment metadata.
    pub fn environment(&self) -> &JsonMap {
        &self.environment
    }

    /// Emits a record at `level`.
    pub fn log(&self, level: LogLevel, message: impl Into<Value>) {
        let record = LogRecord {
            level,
            timestamp: chrono::Utc::now().timestamp_millis(),
            source: self.source.clone(),
            message: message.into(),
            event: self.event.clone(),
            request: self.request.clone(),
            response: self.response.clone(),
            raw_event: Value::clone(&self.raw),
            environment: JsonMap::clone(&self.environment),
        };
        self.sink.emit(level, &record);
    }

    /// Emits at trace level.
    pub fn trace(&self, message: impl Into<Value>) {
        self.log(LogLevel::Trace, message);
    }

    /// Emits at debug level.
    pub fn debug(&self, message: impl Into<Value>) {
        self.log(LogLevel::Debug, message);
    }

    /// Emits at info level.
    pub fn info(&self, message: impl Into<Value>) {
        self.log(LogLevel::Info, message);
    }

    /// Emits at warn level.
    pub fn warn(&self, message: impl Into<Value>) {
        self.log(LogLevel::Warn, message);
    }

    /// Emits at error level.
    pub fn error(&self, message: impl Into<Value>) {
        self.log(LogLevel::Error, message);
    }

    /// Emits at fatal level.
    pub fn fatal(&self, message: impl Into<Value>) {
        self.log(LogLevel::Fatal, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Capture(Mutex<Vec<LogRecord>>);

    impl LogSink for Capture {
        fn emit(&self, _level: LogLevel, record: &LogRecord) {
            self.0.lock().unwrap().push(record.clone());
        }
    }

    #[test]
    fn test_level_ordering_and_names() {
        assert!(LogLevel::Trace < LogLevel::Fatal);
        assert_eq!(LogLevel::Warn.to_string(), "warn");
        assert_eq!(serde_json::to_value(LogLevel::Error).unwrap(), "error");
    }

    #[test]
    fn test_record_carries_context() {
        let sink = Arc::new(Capture::default());
        let mut env = JsonMap::new();
        env.insert("region".into(), json!("eu-west-1"));

        let mut logger = Logger::new(sink.clone(), Arc::new(env), Arc::new(json!({"raw": 1})))
            .with_request(json!({"method": "GET"}));
        logger.set_source("function");
        logger.info("hello");

        let records = sink.0.lock().unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.level, LogLevel::Info);
        assert_eq!(record.source, "function");
        assert_eq!(record.message, json!("hello"));
        assert_eq!(record.request, Some(json!({"method": "GET"})));
        assert_eq!(record.raw_event, json!({"raw": 1}));
        assert_eq!(record.environment["region"], "eu-west-1");
        assert!(record.timestamp > 0);
    }

    #[test]
    fn test_record_serialization_omits_missing_snapshots() {
        let record = LogRecord {
            level: LogLevel::Debug,
            timestamp: 1,
            source: "handler".into(),
            message: json!({"k": "v"}),
            event: None,
            request: None,
            response: Some(json!({"statusCode": 200})),
            raw_event: Value::Null,
            environment: JsonMap::new(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("event").is_none());
        assert!(value.get("request").is_none());
        assert_eq!(value["response"]["statusCode"], 200);
        assert_eq!(value["rawEvent"], Value::Null);
    }

    #[test]
    fn test_disabled_logger_is_silent() {
        let logger = Logger::disabled();
        logger.fatal("nothing happens");
        assert_eq!(logger.source(), Logger::HANDLER_SOURCE);
    }
}
