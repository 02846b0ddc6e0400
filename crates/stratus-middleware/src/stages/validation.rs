//! Request validation middleware.
//!
//! Validates either the decoded request body or the query string against a
//! [`Schema`] in the `before` phase. A failing request is answered with
//! `400 Bad Request` and the callback never runs. With `show_errors` the
//! response body lists the schema's messages:
//!
//! ```json
//! { "details": ["name is required"] }
//! ```
//!
//! Schema libraries are plugged in by implementing [`Schema`]; plain
//! closures already do.

use std::fmt;
use std::sync::Arc;

use http::StatusCode;
use serde_json::{json, Value};
use stratus_core::{ApiContext, ApiRequest};

use crate::middleware::{Middleware, Outcome};

/// A validation schema.
pub trait Schema: Send + Sync {
    /// Checks `input`, returning human-readable errors on failure.
    fn validate(&self, input: &Value) -> Result<(), Vec<String>>;
}

impl<F> Schema for F
where
    F: Fn(&Value) -> Result<(), Vec<String>> + Send + Sync,
{
    fn validate(&self, input: &Value) -> Result<(), Vec<String>> {
        self(input)
    }
}

/// Which part of the request is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationTarget {
    /// The decoded request body.
    Json,
    /// The query string parameters, as a JSON object of strings.
    Query,
}

impl ValidationTarget {
    fn select(self, req: &ApiRequest) -> Value {
        match self {
            Self::Json => req.body().clone(),
            Self::Query => Value::Object(
                req.query_params()
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect(),
            ),
        }
    }
}

/// Validator middleware configuration.
///
/// # Example
///
/// ```
/// use serde_json::Value;
/// use stratus_core::ApiContext;
/// use stratus_middleware::{Middleware, ValidationTarget, ValidatorMiddleware};
///
/// let requires_name = |input: &Value| {
///     if input.get("name").and_then(Value::as_str).is_some() {
///         Ok(())
///     } else {
///         Err(vec!["name is required".to_string()])
///     }
/// };
///
/// let validator: Middleware<ApiContext> =
///     ValidatorMiddleware::new(ValidationTarget::Json, requires_name)
///         .show_errors(true)
///         .into();
/// assert_eq!(validator.name(), "validator");
/// ```
#[derive(Clone)]
pub struct ValidatorMiddleware {
    target: ValidationTarget,
    schema: Arc<dyn Schema>,
    show_errors: bool,
}

impl fmt::Debug for ValidatorMiddleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorMiddleware")
            .field("target", &self.target)
            .field("show_errors", &self.show_errors)
            .finish_non_exhaustive()
    }
}

impl ValidatorMiddleware {
    /// Creates a validator that hides error details.
    pub fn new(target: ValidationTarget, schema: impl Schema + 'static) -> Self {
        Self {
            target,
            schema: Arc::new(schema),
            show_errors: false,
        }
    }

    /// Includes the schema's messages in the 400 body.
    #[must_use]
    pub fn show_errors(mut self, show: bool) -> Self {
        self.show_errors = show;
        self
    }

    fn reject(&self, ctx: &mut ApiContext, errors: Vec<String>) {
        ctx.res.status(StatusCode::BAD_REQUEST);
        if self.show_errors {
            ctx.res.json(json!({ "details": errors }));
        }
    }

    /// Builds the middleware value.
    pub fn into_middleware(self) -> Middleware<ApiContext> {
        Middleware::<ApiContext>::new("validator").before(move |ctx| {
            let input = self.target.select(ctx.req());
            if let Err(errors) = self.schema.validate(&input) {
                ctx.log.debug(json!({ "validation": errors }));
                self.reject(ctx, errors);
                let res = ctx.res.clone();
                return Box::pin(async move { Ok(Outcome::Respond(res)) });
            }
            Box::pin(async { Ok(Outcome::Next) })
        })
    }
}

impl From<ValidatorMiddleware> for Middleware<ApiContext> {
    fn from(validator: ValidatorMiddleware) -> Self {
        validator.into_middleware()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MiddlewareStack;

    fn requires_name(input: &Value) -> Result<(), Vec<String>> {
        match input.get("name") {
            Some(Value::String(_)) => Ok(()),
            _ => Err(vec!["name is a required field".to_string()]),
        }
    }

    fn ctx(body: Value) -> ApiContext {
        ApiContext::for_request(
            ApiRequest::builder()
                .method("POST")
                .body(body)
                .query_param("name", "me")
                .build(),
        )
    }

    #[tokio::test]
    async fn test_valid_body_continues() {
        let stack = MiddlewareStack::new(vec![
            ValidatorMiddleware::new(ValidationTarget::Json, requires_name).into(),
        ]);
        let mut ctx = ctx(json!({"name": "John"}));

        assert!(stack.run_before(&mut ctx).await.unwrap().is_none());
        assert_eq!(ctx.res.status_code(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_body_hides_errors_by_default() {
        let stack = MiddlewareStack::new(vec![
            ValidatorMiddleware::new(ValidationTarget::Json, requires_name).into(),
        ]);
        let mut ctx = ctx(json!({"age": 3}));

        let res = stack.run_before(&mut ctx).await.unwrap().unwrap();
        assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(res.body(), None);
    }

    #[tokio::test]
    async fn test_invalid_body_with_errors() {
        let stack = MiddlewareStack::new(vec![ValidatorMiddleware::new(
            ValidationTarget::Json,
            requires_name,
        )
        .show_errors(true)
        .into()]);
        let mut ctx = ctx(json!("not an object"));

        let res = stack.run_before(&mut ctx).await.unwrap().unwrap();
        let body: Value = serde_json::from_str(res.body().unwrap()).unwrap();
        assert_eq!(body, json!({"details": ["name is a required field"]}));
        assert_eq!(res.get_header("content-type"), Some("application/json"));
    }

    #[tokio::test]
    async fn test_query_target() {
        let stack = MiddlewareStack::new(vec![
            ValidatorMiddleware::new(ValidationTarget::Query, requires_name).into(),
        ]);
        // Body is invalid but the query carries `name`
        let mut ctx = ctx(json!({}));

        assert!(stack.run_before(&mut ctx).await.unwrap().is_none());
    }
}
