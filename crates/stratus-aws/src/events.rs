//! Serde models for the Lambda event payloads the provider reads.
//!
//! Only the fields the provider uses are modelled. Unknown fields are
//! ignored and most fields are optional, since test consoles and local
//! emulators often send trimmed events.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use stratus_core::JsonMap;

/// API Gateway REST (v1) proxy event.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayProxyEvent {
    /// HTTP method.
    #[serde(default)]
    pub http_method: String,
    /// Request path.
    #[serde(default)]
    pub path: Option<String>,
    /// Single-value headers.
    #[serde(default)]
    pub headers: Option<IndexMap<String, String>>,
    /// Query string parameters.
    #[serde(default)]
    pub query_string_parameters: Option<IndexMap<String, String>>,
    /// Raw body.
    #[serde(default)]
    pub body: Option<String>,
    /// Whether `body` is base64 encoded.
    #[serde(default)]
    pub is_base64_encoded: bool,
    /// Request metadata.
    #[serde(default)]
    pub request_context: Option<ApiGatewayRequestContext>,
}

/// `requestContext` of a proxy event.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayRequestContext {
    /// Caller identity.
    #[serde(default)]
    pub identity: Option<ApiGatewayIdentity>,
}

/// `requestContext.identity` of a proxy event.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayIdentity {
    /// Client IP address.
    #[serde(default)]
    pub source_ip: Option<String>,
}

/// Proxy integration result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayProxyResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Response headers.
    pub headers: IndexMap<String, String>,
    /// Body, empty when unset.
    pub body: String,
    /// Whether `body` is base64 encoded.
    pub is_base64_encoded: bool,
}

/// SQS event.
#[derive(Debug, Clone, Deserialize)]
pub struct SqsEvent {
    /// Received messages.
    #[serde(rename = "Records", default)]
    pub records: Vec<SqsMessage>,
}

/// One SQS message.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqsMessage {
    /// Message id.
    pub message_id: String,
    /// Raw body.
    #[serde(default)]
    pub body: String,
    /// System attributes.
    #[serde(default)]
    pub attributes: JsonMap,
    /// User attributes.
    #[serde(default)]
    pub message_attributes: JsonMap,
}

/// SNS event.
#[derive(Debug, Clone, Deserialize)]
pub struct SnsEvent {
    /// Delivered notifications.
    #[serde(rename = "Records", default)]
    pub records: Vec<SnsRecord>,
}

/// One SNS record.
#[derive(Debug, Clone, Deserialize)]
pub struct SnsRecord {
    /// The notification.
    #[serde(rename = "Sns")]
    pub sns: SnsMessage,
}

/// An SNS notification.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnsMessage {
    /// Message id.
    pub message_id: String,
    /// Raw message.
    #[serde(default)]
    pub message: String,
    /// Message attributes.
    #[serde(default)]
    pub message_attributes: JsonMap,
}
