//! Helpers shared by provider adapters.

use indexmap::IndexMap;
use serde_json::Value;

/// Decodes a raw event body.
///
/// The body is parsed as JSON when possible. Anything that does not parse is
/// kept as the original string, so translation never fails on a bad body.
///
/// # Example
///
/// ```
/// use stratus_core::decode_body;
/// use serde_json::json;
///
/// assert_eq!(decode_body(r#"{"a":1}"#), json!({"a": 1}));
/// assert_eq!(decode_body("Test message."), json!("Test message."));
/// ```
pub fn decode_body(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Parses a `Cookie` header value into name/value pairs.
///
/// Pairs without `=` are skipped. Surrounding quotes are removed from values.
pub fn parse_cookies(header_value: &str) -> IndexMap<String, String> {
    let mut cookies = IndexMap::new();

    for cookie in header_value.split(';') {
        let cookie = cookie.trim();
        if let Some((name, value)) = cookie.split_once('=') {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let value = value.trim().trim_matches('"');
            cookies.insert(name.to_string(), value.to_string());
        }
    }

    cookies
}
