//! # Stratus AWS
//!
//! An AWS Lambda provider for Stratus.
//!
//! | Kind  | Trigger                      | Wire result                                        |
//! |-------|------------------------------|----------------------------------------------------|
//! | API   | API Gateway REST proxy event | `{statusCode, headers, body, isBase64Encoded}`     |
//! | Queue | SQS event (first record)     | the response body string, or `null`                |
//! | Bus   | SNS event (first record)     | nothing                                            |
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use stratus::prelude::*;
//! use stratus_aws::AwsProvider;
//!
//! let setup = EventHandlerSetup::new(SetupOptions::builder(Arc::new(AwsProvider::new())).build());
//! let handler = setup.api(|ctx| {
//!     Box::pin(async move {
//!         ctx.res.text("pong");
//!         Ok(())
//!     })
//! });
//! # let _ = handler;
//! ```

#![doc(html_root_url = "https://docs.rs/stratus-aws/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod events;
mod headers;
mod provider;

pub use headers::capitalize_header;
pub use provider::{AwsProvider, LAMBDA_ENV_VARS};
