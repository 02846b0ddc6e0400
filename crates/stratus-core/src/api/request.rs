//! The uniform API request.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// An incoming API request, translated from a provider event.
///
/// All fields are fixed at construction. Header lookups through
/// [`header`](Self::header) ignore ASCII case; the original key spelling is
/// kept in [`headers`](Self::headers).
///
/// # Example
///
/// ```
/// use stratus_core::ApiRequest;
/// use serde_json::json;
///
/// let req = ApiRequest::builder()
///     .method("POST")
///     .header("Content-Type", "application/json")
///     .body(json!({"name": "John"}))
///     .query_param("page", "2")
///     .path("/users")
///     .build();
///
/// assert_eq!(req.method(), "POST");
/// assert_eq!(req.header("content-type"), Some("application/json"));
/// assert_eq!(req.query("page"), Some("2"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    method: String,
    headers: IndexMap<String, String>,
    body: Value,
    query_string_parameters: IndexMap<String, String>,
    path_parameters: String,
    cookies: IndexMap<String, String>,
    ip_address: Option<String>,
}

impl ApiRequest {
    /// Creates a new request builder.
    #[must_use]
    pub fn builder() -> ApiRequestBuilder {
        ApiRequestBuilder::default()
    }

    /// Returns the HTTP method as sent by the provider.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns all request headers.
    pub fn headers(&self) -> &IndexMap<String, String> {
        &self.headers
    }

    /// Returns a header value, matching the name case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the decoded body.
    ///
    /// JSON bodies are already parsed; anything else is a JSON string.
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Returns all query string parameters.
    pub fn query_params(&self) -> &IndexMap<String, String> {
        &self.query_string_parameters
    }

    /// Returns a single query string parameter.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query_string_parameters.get(name).map(String::as_str)
    }

    /// Returns the request path.
    pub fn path(&self) -> &str {
        &self.path_parameters
    }

    /// Alias of [`path`](Self::path).
    pub fn param(&self) -> &str {
        &self.path_parameters
    }

    /// Returns all cookies.
    pub fn cookies(&self) -> &IndexMap<String, String> {
        &self.cookies
    }

    /// Returns a single cookie value.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Returns the client IP address, if the provider exposes one.
    pub fn ip_address(&self) -> Option<&str> {
        self.ip_address.as_deref()
    }
}

/// Builder for [`ApiRequest`].
#[derive(Debug, Clone, Default)]
pub struct ApiRequestBuilder {
    method: String,
    headers: IndexMap<String, String>,
    body: Option<Value>,
    query_string_parameters: IndexMap<String, String>,
    path_parameters: String,
    cookies: IndexMap<String, String>,
    ip_address: Option<String>,
}

impl ApiRequestBuilder {
    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Replaces all headers.
    #[must_use]
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers = headers
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Sets the decoded body.
    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a query string parameter.
    #[must_use]
    pub fn query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_string_parameters.insert(name.into(), value.into());
        self
    }

    /// Replaces all query string parameters.
    #[must_use]
    pub fn query_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query_string_parameters = params
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Sets the request path.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path_parameters = path.into();
        self
    }

    /// Replaces all cookies.
    #[must_use]
    pub fn cookies(mut self, cookies: IndexMap<String, String>) -> Self {
        self.cookies = cookies;
        self
    }

    /// Sets the client IP address.
    #[must_use]
    pub fn ip_address(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    /// Builds the request. A missing body becomes an empty string.
    #[must_use]
    pub fn build(self) -> ApiRequest {
        ApiRequest {
            method: self.method,
            headers: self.headers,
            body: self.body.unwrap_or_else(|| Value::String(String::new())),
            query_string_parameters: self.query_string_parameters,
            path_parameters: self.path_parameters,
            cookies: self.cookies,
            ip_address: self.ip_address,
        }
    }
}
