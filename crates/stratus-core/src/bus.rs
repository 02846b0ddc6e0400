//! Pub/sub notification event.

use serde::Serialize;
use serde_json::Value;

use crate::JsonMap;

/// A pub/sub notification translated from a provider event.
///
/// Bus invocations have no response channel, so there is no matching
/// response type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusEvent {
    id: String,
    body: Value,
    attributes: JsonMap,
}

impl BusEvent {
    /// Creates an event with no attributes.
    pub fn new(id: impl Into<String>, body: Value) -> Self {
        Self {
            id: id.into(),
            body,
            attributes: JsonMap::new(),
        }
    }

    /// Sets the message attributes.
    #[must_use]
    pub fn with_attributes(mut self, attributes: JsonMap) -> Self {
        self.attributes = attributes;
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

    /// Message attributes.
    pub fn attributes(&self) -> &JsonMap {
        &self.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snapshot_serialization() {
        let event = BusEvent::new("95df01b4", json!("Hello from SNS!"));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({"id": "95df01b4", "body": "Hello from SNS!", "attributes": {}})
        );
    }
}
