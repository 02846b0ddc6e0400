//! Pub/sub invocations.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use stratus_core::{BoxError, BusContext, EventKind};
use stratus_middleware::Phase;
use stratus_telemetry::{record_invocation, InvocationOutcome};

use super::{error_message, report, Pipeline};

/// A bus event handler.
///
/// Bus invocations return nothing. There is no `after` phase, and `on_error`
/// middlewares observe a callback error but never suppress it.
#[derive(Clone)]
pub struct BusHandler {
    pipeline: Arc<Pipeline<BusContext>>,
}

impl fmt::Debug for BusHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BusHandler").field(&self.pipeline).finish()
    }
}

impl BusHandler {
    pub(crate) fn new(pipeline: Pipeline<BusContext>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    /// Names of the middlewares run for each invocation, in order.
    pub fn middleware_names(&self) -> Vec<&str> {
        self.pipeline.stack.names()
    }

    /// Handles one raw event.
    ///
    /// # Errors
    ///
    /// Returns the callback's error after every `on_error` middleware ran,
    /// the error raised by a `before` middleware, or the provider's
    /// translation error.
    pub async fn handle_event(&self, raw: Value) -> Result<(), BoxError> {
        let started = Instant::now();
        let pipeline = &self.pipeline;
        let raw = Arc::new(raw);

        let event = match pipeline.provider.bus().handle_event(&raw) {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(kind = "bus", error = %err, "event translation failed");
                pipeline.logger(&raw).error(error_message("bus", &err));
                record_invocation(EventKind::Bus, InvocationOutcome::Failed, started.elapsed());
                return Err(Box::new(err));
            }
        };

        let log = pipeline
            .logger(&raw)
            .with_event(serde_json::to_value(&event).unwrap_or(Value::Null));
        let mut ctx = BusContext::new(raw, event, log, pipeline.extra());

        match self.run(&mut ctx).await {
            Ok(outcome) => {
                record_invocation(EventKind::Bus, outcome, started.elapsed());
                Ok(())
            }
            Err(err) => {
                report(&mut ctx, &*err);
                record_invocation(EventKind::Bus, InvocationOutcome::Failed, started.elapsed());
                Err(err)
            }
        }
    }

    async fn run(&self, ctx: &mut BusContext) -> Result<InvocationOutcome, BoxError> {
        let pipeline = &self.pipeline;
        if pipeline.stack.run_before(ctx).await?.is_some() {
            return Ok(InvocationOutcome::ShortCircuited);
        }

        let Err(err) = pipeline.call(ctx).await else {
            return Ok(InvocationOutcome::Completed);
        };
        tracing::debug!(kind = "bus", error = %err, "callback failed");

        for failure in pipeline.stack.run_on_error_all(&*err, ctx).await {
            tracing::warn!(kind = "bus", error = %failure, "on_error middleware failed");
            ctx.log.set_source(Phase::OnError.source());
            ctx.log.warn(error_message("bus", &*failure));
        }
        Err(err)
    }
}
