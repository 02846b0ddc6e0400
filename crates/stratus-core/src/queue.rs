//! Queue message event and response.

use serde::Serialize;
use serde_json::Value;

use crate::JsonMap;

/// A queue message translated from a provider event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEvent {
    id: String,
    body: Value,
    attributes: JsonMap,
    message_attributes: JsonMap,
}

impl QueueEvent {
    /// Creates an event with empty attribute maps.
    pub fn new(id: impl Into<String>, body: Value) -> Self {
        Self {
            id: id.into(),
            body,
            attributes: JsonMap::new(),
            message_attributes: JsonMap::new(),
        }
    }

    /// Sets the system attributes.
    #[must_use]
    pub fn with_attributes(mut self, attributes: JsonMap) -> Self {
        self.attributes = attributes;
        self
    }

    /// Sets the user message attributes.
    #[must_use]
    pub fn with_message_attributes(mut self, message_attributes: JsonMap) -> Self {
        self.message_attributes = message_attributes;
        self
    }

    /// Message identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Decoded message body.
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// System attributes.
    pub fn attributes(&self) -> &JsonMap {
        &self.attributes
    }

    /// User message attributes.
    pub fn message_attributes(&self) -> &JsonMap {
        &self.message_attributes
    }
}

/// Body-only response for queue invocations.
///
/// Starts unset. [`export`](Self::export) yields the raw body string, which
/// the provider may return to the trigger or drop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueResponse {
    body: Option<String>,
}

impl QueueResponse {
    /// Creates an unset response.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a JSON body with 2-space indentation.
    pub fn json(&mut self, body: Value) -> &mut Self {
        self.body = Some(
            serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string()),
        );
        self
    }

    /// Serializes any value as the JSON body.
    pub fn try_json<T: Serialize + ?Sized>(
        &mut self,
        body: &T,
    ) -> Result<&mut Self, serde_json::Error> {
        self.body = Some(serde_json::to_string_pretty(body)?);
        Ok(self)
    }

    /// Sets a text body.
    pub fn text(&mut self, body: impl Into<String>) -> &mut Self {
        self.body = Some(body.into());
        self
    }

    /// Sets an HTML body.
    pub fn html(&mut self, body: impl Into<String>) -> &mut Self {
        self.text(body)
    }

    /// Sends a string as text and anything else as JSON.
    pub fn send(&mut self, body: Value) -> &mut Self {
        match body {
            Value::String(text) => self.text(text),
            other => self.json(other),
        }
    }

    /// Returns the current body.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Returns the raw body value.
    #[must_use]
    pub fn export(&self) -> Option<String> {
        self.body.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_accessors() {
        let mut attrs = JsonMap::new();
        attrs.insert("ApproximateReceiveCount".into(), json!("1"));

        let event = QueueEvent::new("059f36b4", json!("Test message.")).with_attributes(attrs);
        assert_eq!(event.id(), "059f36b4");
        assert_eq!(event.body(), &json!("Test message."));
        assert_eq!(event.attributes()["ApproximateReceiveCount"], "1");
        assert!(event.message_attributes().is_empty());
    }

    #[test]
    fn test_response_starts_unset() {
        assert_eq!(QueueResponse::new().export(), None);
    }

    #[test]
    fn test_response_json() {
        let mut res = QueueResponse::new();
        res.json(json!({"success": false}));
        assert_eq!(res.export().as_deref(), Some("{\n  \"success\": false\n}"));
    }

    #[test]
    fn test_response_send() {
        let mut res = QueueResponse::new();
        res.send(json!("done"));
        assert_eq!(res.body(), Some("done"));
        res.send(json!([1, 2]));
        assert_eq!(res.body(), Some("[\n  1,\n  2\n]"));
    }
}
