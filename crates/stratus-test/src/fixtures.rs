//! Raw provider events.
//!
//! The events follow the envelopes a serverless runtime hands to a function:
//! an HTTP gateway proxy event, a queue batch with one record and a pub/sub
//! notification batch with one record.

use serde_json::{json, Value};

/// Message id of the record in [`queue_event`].
pub const QUEUE_MESSAGE_ID: &str = "059f36b4-87a3-44ab-83d2-661975830a7d";

/// Message id of the record in [`bus_event`].
pub const BUS_MESSAGE_ID: &str = "95df01b4-ee98-5cb9-9903-4c221d41eb5e";

/// Cookie header sent by [`api_event`].
pub const COOKIE_HEADER: &str = "__gads=ID=d51d609e5753330d:T=1443694116:S=ALNI_MbjWKzLwdEpWZ5wR5WXRI2dtjIpHw; __qca=P0-179798513-1443694132017; _ga=GA1.2.344061584.1441769647";

/// A `GET /me?name=me` request with a JSON body.
#[must_use]
pub fn api_event() -> Value {
    json!({
        "body": "{\"message\": \"Hello, world!\"}",
        "resource": "/{proxy+}",
        "path": "/me",
        "httpMethod": "GET",
        "isBase64Encoded": false,
        "queryStringParameters": { "name": "me" },
        "pathParameters": { "proxy": "me" },
        "stageVariables": null,
        "headers": {
            "Accept": "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            "Accept-Encoding": "gzip, deflate, sdch",
            "Accept-Language": "en-US,en;q=0.8",
            "Cache-Control": "max-age=0",
            "Content-Type": "application/json",
            "Cookie": COOKIE_HEADER,
            "Host": "1234567890.execute-api.us-east-1.amazonaws.com",
            "User-Agent": "Custom User Agent String",
            "X-Forwarded-For": "221.24.103.21, 54.242.148.216",
            "X-Forwarded-Port": "443",
            "X-Forwarded-Proto": "https"
        },
        "requestContext": {
            "accountId": "123456789012",
            "resourceId": "123456",
            "stage": "prod",
            "requestId": "c6af9ac6-7b61-11e6-9a41-93e8deadbeef",
            "identity": {
                "sourceIp": "50.129.117.14",
                "userAgent": "Custom User Agent String"
            },
            "resourcePath": "/{proxy+}",
            "httpMethod": "GET",
            "apiId": "1234567890"
        }
    })
}

/// [`api_event`] with a different HTTP method.
#[must_use]
pub fn api_event_with_method(method: &str) -> Value {
    let mut event = api_event();
    event["httpMethod"] = json!(method);
    event["requestContext"]["httpMethod"] = json!(method);
    event
}

/// [`api_event`] with an extra request header.
#[must_use]
pub fn api_event_with_header(name: &str, value: &str) -> Value {
    let mut event = api_event();
    event["headers"][name] = json!(value);
    event
}

/// [`api_event`] with a different raw body.
#[must_use]
pub fn api_event_with_body(body: &str) -> Value {
    let mut event = api_event();
    event["body"] = json!(body);
    event
}

/// A queue batch with one plain-text record.
#[must_use]
pub fn queue_event() -> Value {
    queue_event_with_body("Test message.")
}

/// A queue batch with one record carrying `body`.
#[must_use]
pub fn queue_event_with_body(body: &str) -> Value {
    json!({
        "Records": [
            {
                "messageId": QUEUE_MESSAGE_ID,
                "receiptHandle": "AQEBwJnKyrHigUMZj6rYigCgxlaS3SLy0a...",
                "body": body,
                "attributes": {
                    "ApproximateReceiveCount": "1",
                    "SentTimestamp": "1545082649183",
                    "SenderId": "594035263019",
                    "ApproximateFirstReceiveTimestamp": "1545082649185"
                },
                "messageAttributes": {},
                "md5OfBody": "098f6bcd4621d373cade4e832627b4f6",
                "eventSource": "aws:sqs",
                "eventSourceARN": "arn:aws:sqs:us-east-2:594035263019:my-queue",
                "awsRegion": "us-east-2"
            }
        ]
    })
}

/// A notification batch with one plain-text record.
#[must_use]
pub fn bus_event() -> Value {
    bus_event_with_message("Hello from SNS!")
}

/// A notification batch with one record carrying `message`.
#[must_use]
pub fn bus_event_with_message(message: &str) -> Value {
    json!({
        "Records": [
            {
                "EventVersion": "1.0",
                "EventSubscriptionArn": "arn:aws:sns:us-east-2:123456789012:sns-lambda:21be56ed-a058-49f5-8c98-aedd2564c486",
                "EventSource": "aws:sns",
                "Sns": {
                    "SignatureVersion": "1",
                    "Timestamp": "2019-01-02T12:45:07.000Z",
                    "Signature": "tcc6faL2yUC6dgZdmrwh1Y4cGa/ebXEkAi6RibDsvpi+tE/1+82j...65r==",
                    "SigningCertUrl": "https://sns.us-east-2.amazonaws.com/SimpleNotificationService-ac565b8b1a6c5d002d285f9598aa1d9b.pem",
                    "MessageId": BUS_MESSAGE_ID,
                    "Message": message,
                    "MessageAttributes": {
                        "Test": { "Type": "String", "Value": "TestString" },
                        "TestBinary": { "Type": "Binary", "Value": "TestBinary" }
                    },
                    "Type": "Notification",
                    "UnsubscribeUrl": "https://sns.us-east-2.amazonaws.com/?Action=Unsubscribe&amp;SubscriptionArn=arn:aws:sns:us-east-2:123456789012:test-lambda:21be56ed-a058-49f5-8c98-aedd2564c486",
                    "TopicArn": "arn:aws:sns:us-east-2:123456789012:sns-lambda",
                    "Subject": "TestInvoke"
                }
            }
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_event_variants() {
        assert_eq!(api_event_with_method("OPTIONS")["httpMethod"], "OPTIONS");
        assert_eq!(
            api_event_with_header("Origin", "https://a.example")["headers"]["Origin"],
            "https://a.example"
        );
        assert_eq!(api_event_with_body("raw")["body"], "raw");
        assert_eq!(api_event()["headers"]["Cookie"], COOKIE_HEADER);
    }

    #[test]
    fn test_single_record_batches() {
        assert_eq!(queue_event()["Records"][0]["messageId"], QUEUE_MESSAGE_ID);
        assert_eq!(bus_event()["Records"][0]["Sns"]["MessageId"], BUS_MESSAGE_ID);
        assert_eq!(
            bus_event_with_message("{}")["Records"][0]["Sns"]["Message"],
            "{}"
        );
    }
}
