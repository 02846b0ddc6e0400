//! An in-memory provider for handler tests.

use std::collections::HashSet;

use serde_json::Value;
use stratus_core::{
    decode_body, parse_cookies, ApiRequest, ApiResponse, ApiTranslator, BusEvent, BusTranslator,
    EventKind, JsonMap, Provider, ProviderError, ProviderResult, QueueEvent, QueueResponse,
    QueueTranslator,
};

/// A provider that reads the envelopes in [`fixtures`](crate::fixtures).
///
/// Fields are read leniently: anything missing becomes empty. The API wire
/// result is the response export itself, so tests can assert on
/// `statusCode`, `headers` and `body` directly.
///
/// # Example
///
/// ```
/// use stratus_core::{EventKind, Provider};
/// use stratus_test::{fixtures, MockProvider};
///
/// let provider = MockProvider::new().with_info("region", "test-1");
/// let req = provider.api().handle_request(&fixtures::api_event()).unwrap();
/// assert_eq!(req.path(), "/me");
/// assert_eq!(provider.logging_additional_info()["region"], "test-1");
///
/// let broken = MockProvider::new().failing(EventKind::Queue);
/// assert!(broken.queue().handle_event(&fixtures::queue_event()).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockProvider {
    info: JsonMap,
    failing: HashSet<EventKind>,
}

impl MockProvider {
    /// Creates a provider with no logging metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a logging metadata entry.
    #[must_use]
    pub fn with_info(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.info.insert(key.into(), value.into());
        self
    }

    /// Makes translation of `kind` events fail with a malformed-event error.
    #[must_use]
    pub fn failing(mut self, kind: EventKind) -> Self {
        self.failing.insert(kind);
        self
    }

    fn check(&self, kind: EventKind) -> ProviderResult<()> {
        if self.failing.contains(&kind) {
            return Err(ProviderError::malformed(kind.as_str(), "mock translation failure"));
        }
        Ok(())
    }
}

fn string_map(value: &Value) -> impl Iterator<Item = (String, String)> + '_ {
    value
        .as_object()
        .into_iter()
        .flatten()
        .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
}

fn object(value: &Value) -> JsonMap {
    value.as_object().cloned().unwrap_or_default()
}

fn first_record(raw: &Value, kind: EventKind) -> ProviderResult<&Value> {
    raw.get("Records")
        .and_then(Value::as_array)
        .and_then(|records| records.first())
        .ok_or(ProviderError::NoRecords {
            kind: kind.as_str(),
        })
}

impl ApiTranslator for MockProvider {
    fn handle_request(&self, raw: &Value) -> ProviderResult<ApiRequest> {
        self.check(EventKind::Api)?;

        let headers = &raw["headers"];
        let cookies = headers
            .as_object()
            .into_iter()
            .flatten()
            .find(|(name, _)| name.eq_ignore_ascii_case("cookie"))
            .and_then(|(_, v)| v.as_str())
            .map(parse_cookies)
            .unwrap_or_default();

        let mut builder = ApiRequest::builder()
            .method(raw["httpMethod"].as_str().unwrap_or_default())
            .headers(string_map(headers))
            .query_params(string_map(&raw["queryStringParameters"]))
            .path(raw["path"].as_str().unwrap_or_default())
            .cookies(cookies)
            .body(decode_body(raw["body"].as_str().unwrap_or_default()));

        if let Some(ip) = raw["requestContext"]["identity"]["sourceIp"].as_str() {
            builder = builder.ip_address(ip);
        }
        Ok(builder.build())
    }

    fn handle_response(&self, res: &ApiResponse) -> Value {
        serde_json::to_value(res.export()).unwrap_or(Value::Null)
    }
}

impl QueueTranslator for MockProvider {
    fn handle_event(&self, raw: &Value) -> ProviderResult<QueueEvent> {
        self.check(EventKind::Queue)?;
        let record = first_record(raw, EventKind::Queue)?;

        Ok(QueueEvent::new(
            record["messageId"].as_str().unwrap_or_default(),
            record["body"].as_str().map_or(Value::Null, decode_body),
        )
        .with_attributes(object(&record["attributes"]))
        .with_message_attributes(object(&record["messageAttributes"])))
    }

    fn handle_response(&self, res: &QueueResponse) -> Value {
        res.export().map_or(Value::Null, Value::String)
    }
}

impl BusTranslator for MockProvider {
    fn handle_event(&self, raw: &Value) -> ProviderResult<BusEvent> {
        self.check(EventKind::Bus)?;
        let sns = &first_record(raw, EventKind::Bus)?["Sns"];

        Ok(BusEvent::new(
            sns["MessageId"].as_str().unwrap_or_default(),
            sns["Message"].as_str().map_or(Value::Null, decode_body),
        )
        .with_attributes(object(&sns["MessageAttributes"])))
    }
}

impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn api(&self) -> &dyn ApiTranslator {
        self
    }

    fn queue(&self) -> &dyn QueueTranslator {
        self
    }

    fn bus(&self) -> &dyn BusTranslator {
        self
    }

    fn logging_additional_info(&self) -> JsonMap {
        self.info.clone()
    }
}
