//! Queue invocations.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use stratus_core::{BoxError, EventKind, QueueContext};
use stratus_telemetry::{record_invocation, InvocationOutcome};

use super::{error_message, report, Completion, Pipeline};

/// A queue event handler.
///
/// An unrecovered callback error is returned unchanged so the trigger can
/// apply its own redelivery policy.
#[derive(Clone)]
pub struct QueueHandler {
    pipeline: Arc<Pipeline<QueueContext>>,
}

impl fmt::Debug for QueueHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("QueueHandler").field(&self.pipeline).finish()
    }
}

impl QueueHandler {
    pub(crate) fn new(pipeline: Pipeline<QueueContext>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    /// Names of the middlewares run for each invocation, in order.
    pub fn middleware_names(&self) -> Vec<&str> {
        self.pipeline.stack.names()
    }

    /// Handles one raw event and returns the provider's wire result.
    ///
    /// # Errors
    ///
    /// Returns the callback's error when no `on_error` middleware recovered
    /// it, the error raised by a middleware phase, or the provider's
    /// translation error.
    pub async fn handle_event(&self, raw: Value) -> Result<Value, BoxError> {
        let started = Instant::now();
        let pipeline = &self.pipeline;
        let translator = pipeline.provider.queue();
        let raw = Arc::new(raw);

        let event = match translator.handle_event(&raw) {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(kind = "queue", error = %err, "event translation failed");
                pipeline.logger(&raw).error(error_message("queue", &err));
                record_invocation(EventKind::Queue, InvocationOutcome::Failed, started.elapsed());
                return Err(Box::new(err));
            }
        };

        let log = pipeline
            .logger(&raw)
            .with_event(serde_json::to_value(&event).unwrap_or(Value::Null));
        let mut ctx = QueueContext::new(raw, event, log, pipeline.extra());

        let outcome = match pipeline.run(&mut ctx).await {
            Ok(Completion::Responded(res, outcome)) => {
                ctx.res = res;
                outcome
            }
            Ok(Completion::Finished(outcome)) => outcome,
            Err(err) => {
                report(&mut ctx, &*err);
                record_invocation(EventKind::Queue, InvocationOutcome::Failed, started.elapsed());
                return Err(err);
            }
        };

        record_invocation(EventKind::Queue, outcome, started.elapsed());
        Ok(translator.handle_response(&ctx.res))
    }
}
