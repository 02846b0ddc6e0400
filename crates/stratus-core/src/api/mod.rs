//! HTTP API value objects.
//!
//! [`ApiRequest`] is the immutable view a provider builds from its raw event.
//! [`ApiResponse`] is the mutable builder callbacks and middlewares write to;
//! its [`export`](ApiResponse::export) is the plain-data form providers
//! translate into their wire shape.

mod request;
mod response;

pub use request::{ApiRequest, ApiRequestBuilder};
pub use response::{ApiResponse, ApiResponseExport};
