//! Bundled API middlewares.
//!
//! - [`cors`] - CORS response headers and `OPTIONS` preflight replies
//! - [`validation`] - request body / query validation against a [`Schema`]
//!
//! Both convert into a [`Middleware<ApiContext>`](crate::Middleware) with
//! `.into()` so they can be placed in any middleware list.

pub mod cors;
pub mod validation;

pub use cors::{AllowedOrigins, CorsBuilder, CorsMiddleware};
pub use validation::{Schema, ValidationTarget, ValidatorMiddleware};
