//! Middleware stack integration tests.
//!
//! These run the bundled middlewares together with custom ones through a
//! composed stack, the way a handler does:
//!
//! 1. before phase (CORS headers, validation)
//! 2. after phase (preflight reply)
//! 3. on_error phase

use std::sync::{Arc, Mutex};

use http::StatusCode;
use serde_json::{json, Value};
use stratus_core::{ApiContext, ApiRequest, BoxError};
use stratus_middleware::{
    CorsMiddleware, Middleware, MiddlewareStack, Outcome, Phase, ValidationTarget,
    ValidatorMiddleware,
};

fn requires_name(input: &Value) -> Result<(), Vec<String>> {
    if input.get("name").is_some() {
        Ok(())
    } else {
        Err(vec!["name is a required field".to_string()])
    }
}

fn request(method: &str, body: Value) -> ApiContext {
    ApiContext::for_request(
        ApiRequest::builder()
            .method(method)
            .header("Origin", "https://example.com")
            .body(body)
            .build(),
    )
}

fn global() -> Vec<Middleware<ApiContext>> {
    vec![
        CorsMiddleware::builder()
            .allow_origins(["https://example.com"])
            .build()
            .into(),
        ValidatorMiddleware::new(ValidationTarget::Json, requires_name)
            .show_errors(true)
            .into(),
    ]
}

#[tokio::test]
async fn test_cors_headers_survive_validation_failure() {
    let stack = MiddlewareStack::compose(Vec::new(), &global());
    let mut ctx = request("POST", json!({}));

    let res = stack.run_before(&mut ctx).await.unwrap().unwrap();

    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        res.get_header("access-control-allow-origin"),
        Some("https://example.com")
    );
}

#[tokio::test]
async fn test_endpoint_middleware_runs_before_global() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_in_mw = Arc::clone(&seen);
    let inspect = Middleware::<ApiContext>::new("inspect").before(move |ctx| {
        seen_in_mw
            .lock()
            .unwrap()
            .push(ctx.res.has_header("access-control-allow-origin"));
        Box::pin(async { Ok(Outcome::Next) })
    });

    let stack = MiddlewareStack::compose(vec![inspect], &global());
    assert_eq!(stack.names(), vec!["inspect", "cors", "validator"]);

    let mut ctx = request("POST", json!({"name": "John"}));
    assert!(stack.run_before(&mut ctx).await.unwrap().is_none());

    // CORS had not run yet when the endpoint middleware looked
    assert_eq!(*seen.lock().unwrap(), vec![false]);
    assert!(ctx.res.has_header("access-control-allow-origin"));
}

#[tokio::test]
async fn test_preflight_after_phase() {
    let stack = MiddlewareStack::compose(Vec::new(), &global());
    let mut ctx = request("OPTIONS", json!({"name": "x"}));

    assert!(stack.run_before(&mut ctx).await.unwrap().is_none());
    let res = stack.run_after(&mut ctx).await.unwrap().unwrap();
    assert_eq!(res.status_code(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_on_error_receives_original_error() {
    let messages = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&messages);
    let catcher = Middleware::<ApiContext>::new("catcher").on_error(move |err, ctx| {
        sink.lock().unwrap().push(err.to_string());
        ctx.res
            .status(StatusCode::UNPROCESSABLE_ENTITY)
            .json(json!({"error": err.to_string()}));
        let res = ctx.res.clone();
        Box::pin(async move { Ok(Outcome::Respond(res)) })
    });

    let stack = MiddlewareStack::compose(vec![catcher], &global());
    assert_eq!(stack.count(Phase::OnError), 1);

    let mut ctx = request("POST", json!({"name": "x"}));
    let err: BoxError = "invalid state".into();
    let res = stack.run_on_error(&*err, &mut ctx).await.unwrap().unwrap();

    assert_eq!(res.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(*messages.lock().unwrap(), vec!["invalid state".to_string()]);
}
