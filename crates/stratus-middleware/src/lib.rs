//! # Stratus Middleware
//!
//! Middleware contract and phase runner for Stratus handlers.
//!
//! A [`Middleware`] contributes up to three optional phases:
//!
//! | Phase      | Runs                                   | Short-circuit                     |
//! |------------|----------------------------------------|-----------------------------------|
//! | `before`   | before the user callback               | skips the callback and `after`    |
//! | `after`    | after a successful or recovered call   | skips the remaining `after` slots |
//! | `on_error` | when the callback fails                | exported as the recovery response |
//!
//! Slots a middleware leaves empty are skipped. A [`MiddlewareStack`] holds
//! the combined list for one endpoint (endpoint-level middlewares first,
//! then the global ones) and runs each phase strictly in that order.
//!
//! ## Example
//!
//! ```
//! use stratus_core::{ApiContext, ApiRequest};
//! use stratus_middleware::{Middleware, MiddlewareStack, Outcome};
//!
//! let stamp = Middleware::<ApiContext>::new("stamp").before(|ctx| {
//!     Box::pin(async move {
//!         ctx.res.header("x-stamp", "1");
//!         Ok(Outcome::Next)
//!     })
//! });
//!
//! let stack = MiddlewareStack::compose(vec![stamp], &[]);
//! let mut ctx = ApiContext::for_request(ApiRequest::builder().build());
//!
//! let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! let outcome = rt.block_on(stack.run_before(&mut ctx)).unwrap();
//! assert!(outcome.is_none());
//! assert_eq!(ctx.res.get_header("x-stamp"), Some("1"));
//! ```

#![doc(html_root_url = "https://docs.rs/stratus-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod middleware;
pub mod stack;
pub mod stages;

pub use middleware::{BoxFuture, ErrorRef, Middleware, Outcome, Phase, PhaseResult};
pub use stack::MiddlewareStack;
pub use stages::{AllowedOrigins, CorsMiddleware, Schema, ValidationTarget, ValidatorMiddleware};
