//! Invocation metrics.
//!
//! Recorded through the `metrics` facade; no exporter is installed here, so
//! the calls are no-ops until the host installs a recorder.
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `stratus_invocations_total` | Counter | `kind`, `outcome` |
//! | `stratus_invocation_duration_seconds` | Histogram | `kind` |

use std::fmt;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use stratus_core::EventKind;

/// Invocation counter name.
pub const INVOCATIONS_TOTAL: &str = "stratus_invocations_total";

/// Invocation duration histogram name.
pub const INVOCATION_DURATION_SECONDS: &str = "stratus_invocation_duration_seconds";

/// How an invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvocationOutcome {
    /// The callback and every phase ran without a short-circuit.
    Completed,
    /// A `before` or `after` middleware answered.
    ShortCircuited,
    /// The callback failed and `on_error` or a response mutation recovered it.
    Recovered,
    /// The API fallback response was produced.
    Fallback,
    /// An error escaped to the caller.
    Failed,
}

impl InvocationOutcome {
    /// Label value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::ShortCircuited => "short_circuited",
            Self::Recovered => "recovered",
            Self::Fallback => "fallback",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for InvocationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registers metric descriptions with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(INVOCATIONS_TOTAL, "Total number of handler invocations");
    describe_histogram!(
        INVOCATION_DURATION_SECONDS,
        "Handler invocation duration in seconds"
    );
}

/// Records one finished invocation.
pub fn record_invocation(kind: EventKind, outcome: InvocationOutcome, duration: Duration) {
    counter!(
        INVOCATIONS_TOTAL,
        "kind" => kind.as_str(),
        "outcome" => outcome.as_str()
    )
    .increment(1);

    histogram!(INVOCATION_DURATION_SECONDS, "kind" => kind.as_str())
        .record(duration.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels() {
        assert_eq!(InvocationOutcome::Completed.as_str(), "completed");
        assert_eq!(InvocationOutcome::ShortCircuited.to_string(), "short_circuited");
        assert_eq!(InvocationOutcome::Fallback.as_str(), "fallback");
    }

    #[test]
    fn test_record_without_recorder() {
        describe_metrics();
        record_invocation(
            EventKind::Queue,
            InvocationOutcome::Failed,
            Duration::from_millis(3),
        );
    }
}
