//! The AWS provider.

use serde::Deserialize;
use serde_json::Value;
use stratus_core::{
    decode_body, parse_cookies, ApiRequest, ApiResponse, ApiTranslator, BusEvent, BusTranslator,
    JsonMap, Provider, ProviderError, ProviderResult, QueueEvent, QueueResponse, QueueTranslator,
};

use crate::events::{ApiGatewayProxyEvent, ApiGatewayProxyResponse, SnsEvent, SqsEvent};
use crate::headers::capitalize_header;

/// Lambda runtime variables copied into log metadata when set.
pub const LAMBDA_ENV_VARS: [&str; 4] = [
    "AWS_REGION",
    "AWS_LAMBDA_FUNCTION_NAME",
    "AWS_LAMBDA_FUNCTION_VERSION",
    "AWS_LAMBDA_FUNCTION_MEMORY_SIZE",
];

/// Provider for API Gateway, SQS and SNS triggered Lambda functions.
#[derive(Debug, Clone, Default)]
pub struct AwsProvider {
    info: JsonMap,
}

impl AwsProvider {
    /// Creates a provider, reading [`LAMBDA_ENV_VARS`] from the process
    /// environment.
    #[must_use]
    pub fn new() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Creates a provider that reads [`LAMBDA_ENV_VARS`] through `lookup`.
    ///
    /// ```
    /// use stratus_aws::AwsProvider;
    /// use stratus_core::Provider;
    ///
    /// let provider = AwsProvider::from_lookup(|name| {
    ///     (name == "AWS_REGION").then(|| "eu-west-1".to_string())
    /// });
    /// let info = provider.logging_additional_info();
    /// assert_eq!(info["AWS_REGION"], "eu-west-1");
    /// assert_eq!(info.len(), 1);
    /// ```
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let info = LAMBDA_ENV_VARS
            .iter()
            .filter_map(|name| lookup(name).map(|value| (name.to_string(), Value::String(value))))
            .collect();
        Self { info }
    }
}

fn parse<'a, T: Deserialize<'a>>(kind: &'static str, raw: &'a Value) -> ProviderResult<T> {
    T::deserialize(raw).map_err(|e| ProviderError::deserialize(kind, e))
}

impl ApiTranslator for AwsProvider {
    fn handle_request(&self, raw: &Value) -> ProviderResult<ApiRequest> {
        let event: ApiGatewayProxyEvent = parse("api", raw)?;
        let headers = event.headers.unwrap_or_default();

        let cookies = headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("cookie"))
            .map(|(_, value)| parse_cookies(value))
            .unwrap_or_default();

        let mut builder = ApiRequest::builder()
            .method(event.http_method)
            .cookies(cookies)
            .headers(headers)
            .query_params(event.query_string_parameters.unwrap_or_default())
            .path(event.path.unwrap_or_default());

        if let Some(body) = event.body.as_deref().filter(|b| !b.is_empty()) {
            builder = builder.body(decode_body(body));
        }

        let source_ip = event
            .request_context
            .and_then(|rc| rc.identity)
            .and_then(|identity| identity.source_ip);
        if let Some(ip) = source_ip {
            builder = builder.ip_address(ip);
        }

        Ok(builder.build())
    }

    fn handle_response(&self, res: &ApiResponse) -> Value {
        let export = res.export();
        let response = ApiGatewayProxyResponse {
            status_code: export.status_code,
            headers: export
                .headers
                .iter()
                .map(|(name, value)| (capitalize_header(name), value.clone()))
                .collect(),
            body: export.body.unwrap_or_default(),
            is_base64_encoded: export.is_base64_encoded,
        };
        serde_json::to_value(response).unwrap_or(Value::Null)
    }
}

impl QueueTranslator for AwsProvider {
    fn handle_event(&self, raw: &Value) -> ProviderResult<QueueEvent> {
        let event: SqsEvent = parse("queue", raw)?;
        if event.records.len() > 1 {
            tracing::debug!(records = event.records.len(), "only the first SQS record is handled");
        }
        let message = event
            .records
            .into_iter()
            .next()
            .ok_or(ProviderError::NoRecords { kind: "queue" })?;

        Ok(QueueEvent::new(message.message_id, decode_body(&message.body))
            .with_attributes(message.attributes)
            .with_message_attributes(message.message_attributes))
    }

    fn handle_response(&self, res: &QueueResponse) -> Value {
        res.export().map_or(Value::Null, Value::String)
    }
}

impl BusTranslator for AwsProvider {
    fn handle_event(&self, raw: &Value) -> ProviderResult<BusEvent> {
        let event: SnsEvent = parse("bus", raw)?;
        let record = event
            .records
            .into_iter()
            .next()
            .ok_or(ProviderError::NoRecords { kind: "bus" })?;

        let sns = record.sns;
        Ok(BusEvent::new(sns.message_id, decode_body(&sns.message))
            .with_attributes(sns.message_attributes))
    }
}

impl Provider for AwsProvider {
    fn name(&self) -> &str {
        "aws"
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stratus_test::fixtures;

    #[test]
    fn test_api_request() {
        let req = AwsProvider::default()
            .handle_request(&fixtures::api_event())
            .unwrap();

        assert_eq!(req.method(), "GET");
        assert_eq!(req.path(), "/me");
        assert_eq!(req.query("name"), Some("me"));
        assert_eq!(req.body(), &json!({"message": "Hello, world!"}));
        assert_eq!(
            req.header("host"),
            Some("1234567890.execute-api.us-east-1.amazonaws.com")
        );
        assert_eq!(req.ip_address(), Some("50.129.117.14"));
        assert_eq!(req.cookie("__qca"), Some("P0-179798513-1443694132017"));
        assert_eq!(req.cookies().len(), 3);
    }

    #[test]
    fn test_api_request_minimal_event() {
        let req = AwsProvider::default()
            .handle_request(&json!({
                "httpMethod": "POST",
                "headers": null,
                "queryStringParameters": null,
                "body": "not json"
            }))
            .unwrap();

        assert_eq!(req.method(), "POST");
        assert!(req.headers().is_empty());
        assert!(req.query_params().is_empty());
        assert_eq!(req.body(), &json!("not json"));
        assert_eq!(req.path(), "");
        assert_eq!(req.ip_address(), None);
    }

    #[test]
    fn test_api_request_wrong_shape() {
        let err = AwsProvider::default()
            .handle_request(&json!({"httpMethod": 12}))
            .unwrap_err();
        assert!(matches!(err, ProviderError::Deserialize { kind: "api", .. }));
    }

    #[test]
    fn test_api_response() {
        let mut res = ApiResponse::new();
        res.json(json!({"success": true})).header("Authorization", "123");

        let wire = ApiTranslator::handle_response(&AwsProvider::default(), &res);
        assert_eq!(
            wire,
            json!({
                "statusCode": 200,
                "headers": {
                    "Content-Type": "application/json",
                    "Authorization": "123"
                },
                "body": "{\n  \"success\": true\n}",
                "isBase64Encoded": false
            })
        );
    }

    #[test]
    fn test_api_response_empty_body() {
        let wire = ApiTranslator::handle_response(&AwsProvider::default(), &ApiResponse::new());
        assert_eq!(wire["body"], "");
        assert_eq!(wire["headers"], json!({}));
    }

    #[test]
    fn test_queue_event() {
        let event = QueueTranslator::handle_event(&AwsProvider::default(), &fixtures::queue_event())
            .unwrap();
        assert_eq!(event.id(), fixtures::QUEUE_MESSAGE_ID);
        assert_eq!(event.body(), &json!("Test message."));
        assert_eq!(event.attributes()["ApproximateReceiveCount"], "1");
        assert!(event.message_attributes().is_empty());
    }

    #[test]
    fn test_queue_without_records() {
        let err = QueueTranslator::handle_event(&AwsProvider::default(), &json!({"Records": []}))
            .unwrap_err();
        assert!(matches!(err, ProviderError::NoRecords { kind: "queue" }));
    }

    #[test]
    fn test_queue_response() {
        let provider = AwsProvider::default();
        let mut res = QueueResponse::new();
        assert_eq!(QueueTranslator::handle_response(&provider, &res), Value::Null);
        res.text("done");
        assert_eq!(QueueTranslator::handle_response(&provider, &res), json!("done"));
    }

    #[test]
    fn test_bus_event() {
        let event = BusTranslator::handle_event(&AwsProvider::default(), &fixtures::bus_event())
            .unwrap();
        assert_eq!(event.id(), fixtures::BUS_MESSAGE_ID);
        assert_eq!(event.body(), &json!("Hello from SNS!"));
        assert_eq!(event.attributes()["TestBinary"]["Type"], "Binary");
    }

    #[test]
    fn test_logging_info_skips_unset() {
        let provider = AwsProvider::from_lookup(|_| None);
        assert!(provider.logging_additional_info().is_empty());
        assert_eq!(provider.name(), "aws");
    }
}
