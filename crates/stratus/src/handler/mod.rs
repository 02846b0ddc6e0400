//! The pipeline engine.
//!
//! One handler type per event kind. All three share a [`Pipeline`] that holds
//! what setup resolved once: the provider, the composed middleware stack, the
//! callback and the static context and log metadata.

mod api;
mod bus;
mod queue;

pub use api::ApiHandler;
pub use bus::BusHandler;
pub use queue::QueueHandler;

use std::fmt;
use std::sync::Arc;

use serde_json::{json, Value};
use stratus_core::{BoxError, InvocationContext, JsonMap, LogSink, Logger, Provider};
use stratus_middleware::{BoxFuture, ErrorRef, MiddlewareStack, Phase};
use stratus_telemetry::InvocationOutcome;

/// A user callback for contexts of type `C`.
///
/// Written as `|ctx| Box::pin(async move { .. })`.
pub type Callback<C> =
    Arc<dyn for<'a> Fn(&'a mut C) -> BoxFuture<'a, Result<(), BoxError>> + Send + Sync>;

/// How a response-bearing invocation ended without an unrecovered error.
pub(crate) enum Completion<R> {
    /// A middleware short-circuited with this response.
    Responded(R, InvocationOutcome),
    /// The pipeline ran to the end; the context's response is final.
    Finished(InvocationOutcome),
}

pub(crate) struct Pipeline<C: InvocationContext> {
    pub(crate) provider: Arc<dyn Provider>,
    pub(crate) stack: MiddlewareStack<C>,
    callback: Callback<C>,
    extra: JsonMap,
    environment: Arc<JsonMap>,
    sink: Arc<dyn LogSink>,
}

impl<C: InvocationContext> fmt::Debug for Pipeline<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("kind", &C::KIND)
            .field("provider", &self.provider.name())
            .field("middlewares", &self.stack.names())
            .field("extra", &self.extra)
            .finish_non_exhaustive()
    }
}

impl<C: InvocationContext> Pipeline<C> {
    pub(crate) fn new(
        provider: Arc<dyn Provider>,
        stack: MiddlewareStack<C>,
        callback: Callback<C>,
        extra: JsonMap,
        environment: &JsonMap,
        sink: Arc<dyn LogSink>,
    ) -> Self {
        // Configured entries win over what the provider reports.
        let mut merged = provider.logging_additional_info();
        merged.extend(environment.iter().map(|(k, v)| (k.clone(), v.clone())));

        Self {
            provider,
            stack,
            callback,
            extra,
            environment: Arc::new(merged),
            sink,
        }
    }

    /// A logger for one invocation of `raw`.
    pub(crate) fn logger(&self, raw: &Arc<Value>) -> Logger {
        Logger::new(self.sink.clone(), self.environment.clone(), raw.clone())
    }

    /// Static context fields, copied into each new context.
    pub(crate) fn extra(&self) -> JsonMap {
        self.extra.clone()
    }

    async fn call(&self, ctx: &mut C) -> Result<(), BoxError> {
        ctx.enter(Phase::CALLBACK_SOURCE);
        (self.callback)(ctx).await
    }

    /// Runs before, the callback, on-error recovery and after.
    ///
    /// A callback error is recovered when an `on_error` middleware responds
    /// or when the response changed while the `on_error` phase ran. Otherwise
    /// the callback's error is returned. Errors raised by middleware phases
    /// are returned as they are.
    pub(crate) async fn run(&self, ctx: &mut C) -> Result<Completion<C::Response>, BoxError> {
        if let Some(res) = self.stack.run_before(ctx).await? {
            return Ok(Completion::Responded(res, InvocationOutcome::ShortCircuited));
        }

        if let Err(err) = self.call(ctx).await {
            tracing::debug!(kind = %C::KIND, error = %err, "callback failed");
            let snapshot = ctx.response_snapshot();

            if let Some(res) = self.stack.run_on_error(&*err, ctx).await? {
                return Ok(Completion::Responded(res, InvocationOutcome::Recovered));
            }
            if ctx.response_snapshot() != snapshot {
                tracing::debug!(kind = %C::KIND, "response changed during on_error, treating as recovered");
                return Ok(Completion::Finished(InvocationOutcome::Recovered));
            }
            return Err(err);
        }

        if let Some(res) = self.stack.run_after(ctx).await? {
            return Ok(Completion::Responded(res, InvocationOutcome::ShortCircuited));
        }
        Ok(Completion::Finished(InvocationOutcome::Completed))
    }
}

/// Structured message for an error that ends an invocation.
pub(crate) fn error_message(kind: &str, err: &ErrorRef) -> Value {
    json!({
        "kind": kind,
        "error": err.to_string(),
    })
}

/// Emits an error record from the handler with the current response attached.
pub(crate) fn report<C: InvocationContext>(ctx: &mut C, err: &ErrorRef) {
    ctx.enter(Logger::HANDLER_SOURCE);
    ctx.logger().error(error_message(C::KIND.as_str(), err));
}
