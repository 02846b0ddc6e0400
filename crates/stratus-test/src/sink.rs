//! A log sink that keeps records in memory.

use std::sync::Mutex;

use serde_json::Value;
use stratus_core::{LogLevel, LogRecord, LogSink};

/// Collects every emitted [`LogRecord`].
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of every record, oldest first.
    pub fn records(&self) -> Vec<LogRecord> {
        self.lock().clone()
    }

    /// The source tag of every record.
    pub fn sources(&self) -> Vec<String> {
        self.lock().iter().map(|r| r.source.clone()).collect()
    }

    /// The message of every record.
    pub fn messages(&self) -> Vec<Value> {
        self.lock().iter().map(|r| r.message.clone()).collect()
    }

    /// Number of records at `level`.
    pub fn count(&self, level: LogLevel) -> usize {
        self.lock().iter().filter(|r| r.level == level).count()
    }

    /// Drops every record.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LogRecord>> {
        // A panicking test thread must not hide the records from the others.
        self.records.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl LogSink for MemorySink {
    fn emit(&self, _level: LogLevel, record: &LogRecord) {
        self.lock().push(record.clone());
    }
}
