//! # Stratus
//!
//! Provider-agnostic serverless event handlers.
//!
//! Stratus normalizes the events a serverless runtime delivers (HTTP API
//! requests, queue messages and pub/sub notifications) into one model, runs a
//! before/after/on-error middleware pipeline around your callback, and turns
//! the result back into the wire shape the runtime expects.
//!
//! ## Crate Organization
//!
//! - [`core`] - request/response/event types, contexts, the [`Provider`](core::Provider) contract
//! - [`middleware`] - the middleware contract, the phase runner, CORS and validation
//! - [`telemetry`] - `tracing` setup, the default log sink, invocation metrics
//! - [`config`] - layered configuration
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use stratus::prelude::*;
//! use stratus_test::{fixtures, MockProvider};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let setup = EventHandlerSetup::new(SetupOptions::builder(Arc::new(MockProvider::new())).build());
//!
//! let handler = setup.api(|ctx| {
//!     Box::pin(async move {
//!         let name = ctx.req().query("name").unwrap_or("world").to_string();
//!         ctx.res.json(serde_json::json!({ "hello": name }));
//!         Ok(())
//!     })
//! });
//!
//! let result = handler.handle_event(fixtures::api_event()).await;
//! assert_eq!(result["statusCode"], 200);
//! # });
//! ```
//!
//! ## Failure policy
//!
//! | Kind  | Unrecovered callback error | Middleware or translation error |
//! |-------|----------------------------|---------------------------------|
//! | API   | 500 `{"details": "Error"}` | 500 `{"details": "Error"}`      |
//! | Queue | original error returned    | that error returned             |
//! | Bus   | original error returned    | that error returned             |

#![doc(html_root_url = "https://docs.rs/stratus/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod handler;
mod setup;

/// Core types.
pub use stratus_core as core;

/// Middleware contract and bundled middlewares.
pub use stratus_middleware as middleware;

/// Logging and metrics.
pub use stratus_telemetry as telemetry;

/// Configuration loading.
pub use stratus_config as config;

pub use handler::{ApiHandler, BusHandler, Callback, QueueHandler};
pub use setup::{EndpointOptions, EventHandlerSetup, SetupOptions, SetupOptionsBuilder};

/// Prelude for convenient imports.
///
/// ```rust
/// use stratus::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        ApiHandler, BusHandler, EndpointOptions, EventHandlerSetup, QueueHandler, SetupOptions,
    };

    pub use stratus_core::{
        ApiContext, ApiRequest, ApiResponse, BoxError, BusContext, BusEvent, InvocationContext,
        JsonMap, Logger, Provider, QueueContext, QueueEvent, QueueResponse,
    };

    pub use stratus_middleware::{
        AllowedOrigins, CorsMiddleware, Middleware, Outcome, Phase, ValidationTarget,
        ValidatorMiddleware,
    };

    pub use stratus_config::{ConfigLoader, StratusConfig};

    pub use http::StatusCode;
}
