//! CORS (Cross-Origin Resource Sharing) middleware.
//!
//! ## Headers
//!
//! On every request (`before` phase):
//!
//! - `Access-Control-Allow-Origin` when the request origin is allowed
//! - `Access-Control-Allow-Credentials` when credentials are enabled
//! - `Access-Control-Expose-Headers` when expose headers are configured
//!
//! On `OPTIONS` requests (`after` phase), additionally:
//!
//! - `Access-Control-Max-Age`, `Access-Control-Allow-Methods`,
//!   `Access-Control-Allow-Headers`
//!
//! and the invocation is short-circuited with `204 No Content`.
//!
//! ## Example
//!
//! ```
//! use stratus_core::ApiContext;
//! use stratus_middleware::{CorsMiddleware, Middleware};
//! use std::time::Duration;
//!
//! let cors: Middleware<ApiContext> = CorsMiddleware::builder()
//!     .allow_origin("https://app.example.com")
//!     .allow_origin("https://admin.example.com")
//!     .allow_headers(["Content-Type", "Authorization"])
//!     .allow_credentials(true)
//!     .max_age(Duration::from_secs(3600))
//!     .build()
//!     .into();
//! assert_eq!(cors.name(), "cors");
//! ```

use std::sync::Arc;
use std::time::Duration;

use http::{Method, StatusCode};
use stratus_core::ApiContext;

use crate::middleware::{Middleware, Outcome};

/// CORS header names.
pub mod headers {
    /// `Access-Control-Allow-Origin` header.
    pub const ALLOW_ORIGIN: &str = "access-control-allow-origin";
    /// `Access-Control-Allow-Methods` header.
    pub const ALLOW_METHODS: &str = "access-control-allow-methods";
    /// `Access-Control-Allow-Headers` header.
    pub const ALLOW_HEADERS: &str = "access-control-allow-headers";
    /// `Access-Control-Allow-Credentials` header.
    pub const ALLOW_CREDENTIALS: &str = "access-control-allow-credentials";
    /// `Access-Control-Max-Age` header.
    pub const MAX_AGE: &str = "access-control-max-age";
    /// `Access-Control-Expose-Headers` header.
    pub const EXPOSE_HEADERS: &str = "access-control-expose-headers";
    /// `Origin` request header.
    pub const ORIGIN: &str = "origin";
}

/// Which origins receive `Access-Control-Allow-Origin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    /// Any origin; the header value is `*`.
    Any,
    /// A single configured origin, sent on every request.
    Exact(String),
    /// An allow-list; the request origin is echoed back only when listed.
    List(Vec<String>),
}

impl AllowedOrigins {
    /// The header value to send for a request with `origin`, if any.
    pub fn header_value(&self, origin: Option<&str>) -> Option<String> {
        match self {
            Self::Any => Some("*".to_string()),
            Self::Exact(allowed) => Some(allowed.clone()),
            Self::List(allowed) => {
                let origin = origin?;
                allowed
                    .iter()
                    .any(|candidate| candidate == origin)
                    .then(|| origin.to_string())
            }
        }
    }
}

#[derive(Debug, Clone)]
struct CorsConfig {
    allowed_origins: AllowedOrigins,
    allowed_methods: Vec<Method>,
    allowed_headers: Vec<String>,
    expose_headers: Vec<String>,
    allow_credentials: bool,
    max_age: Option<Duration>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: AllowedOrigins::Any,
            allowed_methods: vec![
                Method::GET,
                Method::HEAD,
                Method::PUT,
                Method::POST,
                Method::DELETE,
                Method::PATCH,
                Method::OPTIONS,
            ],
            allowed_headers: Vec::new(),
            expose_headers: Vec::new(),
            allow_credentials: false,
            max_age: None,
        }
    }
}

impl CorsConfig {
    fn apply_request_headers(&self, ctx: &mut ApiContext) {
        let origin = ctx.req().header(headers::ORIGIN).map(str::to_string);
        if let Some(value) = self.allowed_origins.header_value(origin.as_deref()) {
            ctx.res.header(headers::ALLOW_ORIGIN, value);
        }

        if self.allow_credentials {
            ctx.res.header(headers::ALLOW_CREDENTIALS, "true");
        }

        if !self.expose_headers.is_empty() {
            ctx.res
                .header(headers::EXPOSE_HEADERS, self.expose_headers.join(","));
        }
    }

    fn apply_preflight_headers(&self, ctx: &mut ApiContext) {
        if let Some(max_age) = self.max_age {
            ctx.res.header(headers::MAX_AGE, max_age.as_secs());
        }

        if !self.allowed_methods.is_empty() {
            let methods: Vec<&str> = self.allowed_methods.iter().map(Method::as_str).collect();
            ctx.res.header(headers::ALLOW_METHODS, methods.join(","));
        }

        if !self.allowed_headers.is_empty() {
            ctx.res
                .header(headers::ALLOW_HEADERS, self.allowed_headers.join(","));
        }

        ctx.res.status(StatusCode::NO_CONTENT);
    }
}

/// CORS middleware configuration. Convert into a [`Middleware`] to use it.
#[derive(Debug, Clone, Default)]
pub struct CorsMiddleware {
    config: CorsConfig,
}

impl CorsMiddleware {
    /// Creates a new CORS builder.
    #[must_use]
    pub fn builder() -> CorsBuilder {
        CorsBuilder::new()
    }

    /// The configured origins.
    pub fn allowed_origins(&self) -> &AllowedOrigins {
        &self.config.allowed_origins
    }

    /// Builds the middleware value.
    pub fn into_middleware(self) -> Middleware<ApiContext> {
        let config = Arc::new(self.config);
        let before_config = Arc::clone(&config);

        Middleware::<ApiContext>::new("cors")
            .before(move |ctx| {
                before_config.apply_request_headers(ctx);
                Box::pin(async { Ok(Outcome::Next) })
            })
            .after(move |ctx| {
                if ctx.req().method().eq_ignore_ascii_case(Method::OPTIONS.as_str()) {
                    config.apply_preflight_headers(ctx);
                    let res = ctx.res.clone();
                    return Box::pin(async move { Ok(Outcome::Respond(res)) });
                }
                Box::pin(async { Ok(Outcome::Next) })
            })
    }
}

impl From<CorsMiddleware> for Middleware<ApiContext> {
    fn from(cors: CorsMiddleware) -> Self {
        cors.into_middleware()
    }
}

/// Builder for [`CorsMiddleware`].
///
/// Defaults: any origin, methods `GET,HEAD,PUT,POST,DELETE,PATCH,OPTIONS`,
/// no allowed or exposed headers, no credentials, no max age.
#[derive(Debug, Clone, Default)]
pub struct CorsBuilder {
    config: CorsConfig,
}

impl CorsBuilder {
    /// Creates a builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allows any origin (`*`).
    #[must_use]
    pub fn allow_any_origin(mut self) -> Self {
        self.config.allowed_origins = AllowedOrigins::Any;
        self
    }

    /// Adds an allowed origin.
    ///
    /// The first call replaces the default wildcard with that origin; further
    /// calls turn it into an allow-list.
    #[must_use]
    pub fn allow_origin(mut self, origin: impl Into<String>) -> Self {
        let origin = origin.into();
        self.config.allowed_origins = match self.config.allowed_origins {
            AllowedOrigins::Any => AllowedOrigins::Exact(origin),
            AllowedOrigins::Exact(first) => AllowedOrigins::List(vec![first, origin]),
            AllowedOrigins::List(mut origins) => {
                origins.push(origin);
                AllowedOrigins::List(origins)
            }
        };
        self
    }

    /// Replaces the origins with an allow-list.
    #[must_use]
    pub fn allow_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.allowed_origins =
            AllowedOrigins::List(origins.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the allowed HTTP methods.
    #[must_use]
    pub fn allow_methods<I>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = Method>,
    {
        self.config.allowed_methods = methods.into_iter().collect();
        self
    }

    /// Sets the allowed request headers.
    #[must_use]
    pub fn allow_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.allowed_headers = headers.into_iter().map(Into::into).collect();
        self
    }

    /// Sets headers exposed to browser scripts.
    #[must_use]
    pub fn expose_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.expose_headers = headers.into_iter().map(Into::into).collect();
        self
    }

    /// Sets whether credentials are allowed.
    #[must_use]
    pub fn allow_credentials(mut self, allow: bool) -> Self {
        self.config.allow_credentials = allow;
        self
    }

    /// Sets the preflight cache duration, sent in whole seconds.
    #[must_use]
    pub fn max_age(mut self, duration: Duration) -> Self {
        self.config.max_age = Some(duration);
        self
    }

    /// Builds the CORS middleware.
    #[must_use]
    pub fn build(self) -> CorsMiddleware {
        CorsMiddleware {
            config: self.config,
        }
    }
}
