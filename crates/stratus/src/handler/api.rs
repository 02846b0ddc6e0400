//! HTTP API invocations.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use http::StatusCode;
use serde_json::{json, Value};
use stratus_core::{ApiContext, ApiResponse, EventKind, Logger};
use stratus_telemetry::{record_invocation, InvocationOutcome};

use super::{error_message, report, Completion, Pipeline};

/// Turns `res` into the fixed response for an unrecoverable error.
///
/// Headers already on the response are kept.
fn apply_fallback(res: &mut ApiResponse) {
    res.status(StatusCode::INTERNAL_SERVER_ERROR)
        .json(json!({ "details": "Error" }));
}

/// An API event handler.
///
/// Never fails: every invocation resolves to a wire response, falling back to
/// `500 {"details": "Error"}` when an error is not recovered.
#[derive(Clone)]
pub struct ApiHandler {
    pipeline: Arc<Pipeline<ApiContext>>,
}

impl fmt::Debug for ApiHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiHandler").field(&self.pipeline).finish()
    }
}

impl ApiHandler {
    pub(crate) fn new(pipeline: Pipeline<ApiContext>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    /// Names of the middlewares run for each invocation, in order.
    pub fn middleware_names(&self) -> Vec<&str> {
        self.pipeline.stack.names()
    }

    /// Handles one raw event and returns the provider's wire result.
    pub async fn handle_event(&self, raw: Value) -> Value {
        let started = Instant::now();
        let pipeline = &self.pipeline;
        let translator = pipeline.provider.api();
        let raw = Arc::new(raw);

        let req = match translator.handle_request(&raw) {
            Ok(req) => req,
            Err(err) => {
                tracing::warn!(kind = "api", error = %err, "request translation failed");
                let mut res = ApiResponse::new();
                apply_fallback(&mut res);

                let mut log = pipeline.logger(&raw);
                log.set_source(Logger::HANDLER_SOURCE);
                log.set_response(serde_json::to_value(res.export()).ok());
                log.error(error_message("api", &err));

                record_invocation(EventKind::Api, InvocationOutcome::Fallback, started.elapsed());
                return translator.handle_response(&res);
            }
        };

        let log = pipeline
            .logger(&raw)
            .with_request(serde_json::to_value(&req).unwrap_or(Value::Null));
        let mut ctx = ApiContext::new(raw, req, log, pipeline.extra());

        let outcome = match pipeline.run(&mut ctx).await {
            Ok(Completion::Responded(res, outcome)) => {
                ctx.res = res;
                outcome
            }
            Ok(Completion::Finished(outcome)) => outcome,
            Err(err) => {
                apply_fallback(&mut ctx.res);
                report(&mut ctx, &*err);
                InvocationOutcome::Fallback
            }
        };

        record_invocation(EventKind::Api, outcome, started.elapsed());
        translator.handle_response(&ctx.res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_keeps_headers() {
        let mut res = ApiResponse::new();
        res.header("access-control-allow-origin", "*").text("partial");
        apply_fallback(&mut res);

        let export = res.export();
        assert_eq!(export.status_code, 500);
        assert_eq!(export.body.as_deref(), Some("{\n  \"details\": \"Error\"\n}"));
        assert_eq!(export.headers["access-control-allow-origin"], "*");
        assert_eq!(export.headers["content-type"], "application/json");
    }
}
