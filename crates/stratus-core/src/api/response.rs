//! The mutable API response builder.

use http::StatusCode;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;

/// Separator used when a header is set again with a different value.
const HEADER_VALUE_SEPARATOR: char = ';';

/// Mutable response builder for API invocations.
///
/// Defaults to status 200, no headers, no body and `is_base64_encoded = false`.
/// Header keys are lower-cased on the way in. Setting a header that already
/// carries the same value is a no-op; setting it with a new value appends
/// with `;` unless [`override_header`](Self::override_header) is used.
///
/// # Example
///
/// ```
/// use stratus_core::ApiResponse;
/// use http::StatusCode;
/// use serde_json::json;
///
/// let mut res = ApiResponse::new();
/// res.status(StatusCode::CREATED).json(json!({"success": true}));
///
/// let export = res.export();
/// assert_eq!(export.status_code, 201);
/// assert_eq!(export.headers["content-type"], "application/json");
/// assert_eq!(export.body.as_deref(), Some("{\n  \"success\": true\n}"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    status: StatusCode,
    headers: IndexMap<String, String>,
    body: Option<String>,
    is_base64_encoded: bool,
}

/// Plain-data form of an [`ApiResponse`].
///
/// This is what providers translate into their wire format, and what the
/// handler compares to detect whether a response changed during recovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponseExport {
    /// HTTP status code.
    pub status_code: u16,
    /// Lower-cased header names in insertion order.
    pub headers: IndexMap<String, String>,
    /// Response body, if one was set.
    pub body: Option<String>,
    /// Whether `body` is base64 encoded binary data.
    pub is_base64_encoded: bool,
}

impl Default for ApiResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiResponse {
    /// Creates an empty 200 response.
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: IndexMap::new(),
            body: None,
            is_base64_encoded: false,
        }
    }

    /// Returns the plain-data form of the current state.
    #[must_use]
    pub fn export(&self) -> ApiResponseExport {
        ApiResponseExport {
            status_code: self.status.as_u16(),
            headers: self.headers.clone(),
            body: self.body.clone(),
            is_base64_encoded: self.is_base64_encoded,
        }
    }

    /// Sets the status code.
    pub fn status(&mut self, status: StatusCode) -> &mut Self {
        self.status = status;
        self
    }

    /// Returns the current status code.
    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    /// Sets a header, appending to any different existing value.
    pub fn header(&mut self, key: &str, value: impl Display) -> &mut Self {
        self.set_header(key, value.to_string(), false);
        self
    }

    /// Sets a header, replacing any different existing value.
    pub fn override_header(&mut self, key: &str, value: impl Display) -> &mut Self {
        self.set_header(key, value.to_string(), true);
        self
    }

    fn set_header(&mut self, key: &str, value: String, override_existing: bool) {
        let key = key.to_ascii_lowercase();

        match self.headers.get_mut(&key) {
            Some(existing) => {
                let already_present = *existing == value
                    || existing
                        .split(HEADER_VALUE_SEPARATOR)
                        .any(|part| part == value);
                if already_present {
                    return;
                }
                if override_existing {
                    *existing = value;
                } else {
                    existing.push(HEADER_VALUE_SEPARATOR);
                    existing.push_str(&value);
                }
            }
            None => {
                self.headers.insert(key, value);
            }
        }
    }

    /// Sets the `content-type` header, replacing any previous type.
    pub fn content_type(&mut self, mime: impl AsRef<str>) -> &mut Self {
        self.set_header("content-type", mime.as_ref().to_string(), true);
        self
    }

    /// Sets a JSON body (2-space indented) and the JSON content type.
    pub fn json(&mut self, body: Value) -> &mut Self {
        self.content_type(mime::APPLICATION_JSON);
        self.body = Some(pretty_json(&body));
        self
    }

    /// Serializes any value as the JSON body.
    pub fn try_json<T: Serialize + ?Sized>(
        &mut self,
        body: &T,
    ) -> Result<&mut Self, serde_json::Error> {
        let body = serde_json::to_string_pretty(body)?;
        self.content_type(mime::APPLICATION_JSON);
        self.body = Some(body);
        Ok(self)
    }

    /// Sets a plain text body.
    pub fn text(&mut self, body: impl Into<String>) -> &mut Self {
        self.content_type(mime::TEXT_PLAIN);
        self.body = Some(body.into());
        self
    }

    /// Sets an HTML body.
    pub fn html(&mut self, body: impl Into<String>) -> &mut Self {
        self.content_type(mime::TEXT_HTML);
        self.body = Some(body.into());
        self
    }

    /// Sends a string as text and anything else as JSON.
    pub fn send(&mut self, body: Value) -> &mut Self {
        match body {
            Value::String(text) => self.text(text),
            other => self.json(other),
        }
    }

    /// Marks the body as base64 encoded binary data.
    pub fn base64_encoded(&mut self, encoded: bool) -> &mut Self {
        self.is_base64_encoded = encoded;
        self
    }

    /// Returns a header value by case-insensitive name.
    pub fn get_header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns all headers.
    pub fn headers(&self) -> &IndexMap<String, String> {
        &self.headers
    }

    /// Returns true if the header is set.
    pub fn has_header(&self, key: &str) -> bool {
        self.headers.contains_key(&key.to_ascii_lowercase())
    }

    /// Removes a header.
    pub fn remove_header(&mut self, key: &str) -> &mut Self {
        self.headers.shift_remove(&key.to_ascii_lowercase());
        self
    }

    /// Returns the body, if one was set.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Redirects with `302 Found`.
    pub fn redirect(&mut self, location: &str) -> &mut Self {
        self.redirect_with_status(StatusCode::FOUND, location)
    }

    /// Redirects with an explicit status code.
    pub fn redirect_with_status(&mut self, status: StatusCode, location: &str) -> &mut Self {
        self.status(status);
        self.header("location", location)
    }
}

// Serializing a `Value` cannot fail; the fallback only satisfies the signature.
fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let res = ApiResponse::new();
        assert_eq!(
            res.export(),
            ApiResponseExport {
                status_code: 200,
                headers: IndexMap::new(),
                body: None,
                is_base64_encoded: false,
            }
        );
    }

    #[test]
    fn test_status() {
        let mut res = ApiResponse::new();
        res.status(StatusCode::NOT_FOUND);
        assert_eq!(res.export().status_code, 404);
    }

    #[test]
    fn test_headers_are_lower_cased() {
        let mut res = ApiResponse::new();
        res.header("Content-Type", "application/json")
            .header("Cache-Control", "no-cache");

        let headers = res.export().headers;
        assert_eq!(headers["content-type"], "application/json");
        assert_eq!(headers["cache-control"], "no-cache");
        assert_eq!(res.get_header("CONTENT-TYPE"), Some("application/json"));
    }

    #[test]
    fn test_header_same_value_is_noop() {
        let mut res = ApiResponse::new();
        res.header("x-custom", "a");
        res.header("X-Custom", "a");
        assert_eq!(res.get_header("x-custom"), Some("a"));
    }

    #[test]
    fn test_header_appends_new_value() {
        let mut res = ApiResponse::new();
        res.header("vary", "origin").header("vary", "accept");
        assert_eq!(res.get_header("vary"), Some("origin;accept"));

        // A value already present in the list is not repeated
        res.header("vary", "origin");
        assert_eq!(res.get_header("vary"), Some("origin;accept"));
    }

    #[test]
    fn test_header_substring_is_not_a_match() {
        let mut res = ApiResponse::new();
        res.header("x-list", "abc").header("x-list", "b");
        assert_eq!(res.get_header("x-list"), Some("abc;b"));
    }

    #[test]
    fn test_override_header() {
        let mut res = ApiResponse::new();
        res.header("x-custom", "a").override_header("x-custom", "b");
        assert_eq!(res.get_header("x-custom"), Some("b"));
    }

    #[test]
    fn test_header_non_string_values() {
        let mut res = ApiResponse::new();
        res.header("Content-Length", 100).header("x-flag", true);
        assert_eq!(res.get_header("content-length"), Some("100"));
        assert_eq!(res.get_header("x-flag"), Some("true"));
    }

    #[test]
    fn test_header_empty_value() {
        let mut res = ApiResponse::new();
        res.header("Cache-Control", "");
        assert_eq!(res.get_header("cache-control"), Some(""));
    }

    #[test]
    fn test_remove_header() {
        let mut res = ApiResponse::new();
        res.header("Content-Type", "application/json")
            .header("Cache-Control", "no-cache")
            .remove_header("content-type");

        assert!(!res.has_header("content-type"));
        assert_eq!(res.headers().len(), 1);
        assert!(res.has_header("Cache-Control"));
    }

    #[test]
    fn test_json_body() {
        let mut res = ApiResponse::new();
        res.json(json!({"success": true, "name": "John"}));

        let export = res.export();
        assert_eq!(export.headers["content-type"], "application/json");
        assert_eq!(
            export.body.as_deref(),
            Some("{\n  \"success\": true,\n  \"name\": \"John\"\n}")
        );
    }

    #[test]
    fn test_try_json_with_struct() {
        #[derive(Serialize)]
        struct Payload {
            details: &'static str,
        }

        let mut res = ApiResponse::new();
        res.try_json(&Payload { details: "Error" }).unwrap();
        assert_eq!(res.body(), Some("{\n  \"details\": \"Error\"\n}"));
    }

    #[test]
    fn test_text_and_html() {
        let mut res = ApiResponse::new();
        res.text("Hello, world!");
        assert_eq!(res.get_header("content-type"), Some("text/plain"));
        assert_eq!(res.body(), Some("Hello, world!"));

        res.html("<p>hi</p>");
        assert_eq!(res.get_header("content-type"), Some("text/html"));
        assert_eq!(res.body(), Some("<p>hi</p>"));
    }

    #[test]
    fn test_send_dispatches_on_value() {
        let mut res = ApiResponse::new();
        res.send(json!("plain"));
        assert_eq!(res.get_header("content-type"), Some("text/plain"));

        res.send(json!({"a": 1}));
        assert_eq!(res.get_header("content-type"), Some("application/json"));
        assert_eq!(res.body(), Some("{\n  \"a\": 1\n}"));
    }

    #[test]
    fn test_redirect() {
        let mut res = ApiResponse::new();
        res.redirect("/new-location");
        let export = res.export();
        assert_eq!(export.status_code, 302);
        assert_eq!(export.headers["location"], "/new-location");
        assert_eq!(export.headers.len(), 1);
    }

    #[test]
    fn test_redirect_with_status() {
        let mut res = ApiResponse::new();
        res.redirect_with_status(StatusCode::MOVED_PERMANENTLY, "/moved");
        assert_eq!(res.status_code(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(res.get_header("location"), Some("/moved"));
    }

    #[test]
    fn test_export_serializes_camel_case() {
        let mut res = ApiResponse::new();
        res.base64_encoded(true).text("aGk=");
        let value = serde_json::to_value(res.export()).unwrap();
        assert_eq!(value["statusCode"], 200);
        assert_eq!(value["isBase64Encoded"], true);
        assert_eq!(value["body"], "aGk=");
    }

    #[test]
    fn test_export_changes_are_observable() {
        let mut res = ApiResponse::new();
        let before = res.export();
        res.header("x-trace", "1");
        assert_ne!(before, res.export());
    }

    proptest! {
        #[test]
        fn prop_setting_unchanged_value_is_idempotent(
            key in "[A-Za-z][A-Za-z0-9-]{0,15}",
            value in "[ -:<-~]{0,24}",
            override_existing in any::<bool>(),
        ) {
            let mut res = ApiResponse::new();
            res.header(&key, &value);
            let before = res.export().headers;

            if override_existing {
                res.override_header(&key, &value);
            } else {
                res.header(&key, &value);
            }

            prop_assert_eq!(before, res.export().headers);
        }
    }
}
