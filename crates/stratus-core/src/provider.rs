//! The provider contract.
//!
//! A provider translates one platform's wire events into the uniform model
//! and back. Raw events and wire results are both `serde_json::Value`, which
//! is what serverless runtimes hand to and accept from a function.
//!
//! Translators must not fail on a bad body; they fall back to the raw
//! string (see [`decode_body`](crate::decode_body)). A
//! [`ProviderError`](crate::ProviderError) is reserved for events whose
//! structure is unusable.

use serde_json::Value;

use crate::{
    ApiRequest, ApiResponse, BusEvent, JsonMap, ProviderResult, QueueEvent, QueueResponse,
};

/// Translation for HTTP API events.
pub trait ApiTranslator: Send + Sync {
    /// Builds a request from the raw event.
    fn handle_request(&self, raw: &Value) -> ProviderResult<ApiRequest>;

    /// Converts the response's current state into the wire result.
    fn handle_response(&self, res: &ApiResponse) -> Value;
}

/// Translation for queue events.
pub trait QueueTranslator: Send + Sync {
    /// Builds a message from the raw event.
    fn handle_event(&self, raw: &Value) -> ProviderResult<QueueEvent>;

    /// Converts the response's current state into the wire result.
    fn handle_response(&self, res: &QueueResponse) -> Value;
}

/// Translation for pub/sub events.
///
/// There is no response member: bus invocations return nothing.
pub trait BusTranslator: Send + Sync {
    /// Builds a notification from the raw event.
    fn handle_event(&self, raw: &Value) -> ProviderResult<BusEvent>;
}

/// A platform adapter, injected at setup time.
///
/// # Example
///
/// ```
/// use serde_json::{json, Value};
/// use stratus_core::*;
///
/// struct Echo;
///
/// impl ApiTranslator for Echo {
///     fn handle_request(&self, raw: &Value) -> ProviderResult<ApiRequest> {
///         Ok(ApiRequest::builder().body(raw.clone()).build())
///     }
///     fn handle_response(&self, res: &ApiResponse) -> Value {
///         serde_json::to_value(res.export()).unwrap_or(Value::Null)
///     }
/// }
///
/// impl QueueTranslator for Echo {
///     fn handle_event(&self, raw: &Value) -> ProviderResult<QueueEvent> {
///         Ok(QueueEvent::new("1", raw.clone()))
///     }
///     fn handle_response(&self, res: &QueueResponse) -> Value {
///         res.export().map_or(Value::Null, Value::String)
///     }
/// }
///
/// impl BusTranslator for Echo {
///     fn handle_event(&self, raw: &Value) -> ProviderResult<BusEvent> {
///         Ok(BusEvent::new("1", raw.clone()))
///     }
/// }
///
/// impl Provider for Echo {
///     fn name(&self) -> &str { "echo" }
///     fn api(&self) -> &dyn ApiTranslator { self }
///     fn queue(&self) -> &dyn QueueTranslator { self }
///     fn bus(&self) -> &dyn BusTranslator { self }
/// }
///
/// let provider = Echo;
/// assert!(provider.logging_additional_info().is_empty());
/// let req = provider.api().handle_request(&json!("x")).unwrap();
/// assert_eq!(req.body(), &json!("x"));
/// ```
pub trait Provider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// API translation group.
    fn api(&self) -> &dyn ApiTranslator;

    /// Queue translation group.
    fn queue(&self) -> &dyn QueueTranslator;

    /// Bus translation group.
    fn bus(&self) -> &dyn BusTranslator;

    /// Static environment metadata attached to every log record.
    fn logging_additional_info(&self) -> JsonMap {
        JsonMap::new()
    }
}
