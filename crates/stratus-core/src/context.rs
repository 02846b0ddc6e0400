//! Per-invocation contexts.
//!
//! A context is built exactly once per invocation from the provider's
//! translation of the raw event and is dropped when the invocation ends.
//! There is one concrete type per event kind; they share the
//! [`InvocationContext`] trait so the middleware runner can be generic.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::{ApiRequest, ApiResponse, BusEvent, JsonMap, Logger, QueueEvent, QueueResponse};

/// The three event kinds a handler can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// HTTP API request.
    Api,
    /// Queue message.
    Queue,
    /// Pub/sub notification.
    Bus,
}

impl EventKind {
    /// Returns the lower-case name used in logs and metric labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Queue => "queue",
            Self::Bus => "bus",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Behaviour shared by the three context types.
pub trait InvocationContext: Send + 'static {
    /// What a middleware phase may return to short-circuit.
    ///
    /// Bus contexts use `()`: a short-circuit there only skips the callback.
    type Response: Clone + Send + Sync + 'static;

    /// The event kind this context serves.
    const KIND: EventKind;

    /// The context's logger.
    fn logger(&self) -> &Logger;

    /// Mutable access to the logger, used to update the phase tag.
    fn logger_mut(&mut self) -> &mut Logger;

    /// Plain-data form of the current response, if the kind has one.
    fn response_snapshot(&self) -> Option<Value>;

    /// The untranslated provider event.
    fn raw(&self) -> &Value;

    /// A static extra field merged in from setup.
    fn extra(&self, key: &str) -> Option<&Value>;

    /// Tags subsequent log records with `source` and the current response.
    fn enter(&mut self, source: &str) {
        let response = self.response_snapshot();
        let log = self.logger_mut();
        log.set_source(source);
        log.set_response(response);
    }
}

macro_rules! context_common {
    ($ty:ty) => {
        impl $ty {
            /// The untranslated provider event.
            pub fn raw(&self) -> &Value {
                &self.raw
            }

            /// A static extra field merged in from setup.
            pub fn extra(&self, key: &str) -> Option<&Value> {
                self.extra.get(key)
            }

            /// All static extra fields.
            pub fn extras(&self) -> &JsonMap {
                &self.extra
            }
        }
    };
}

/// Context for an API invocation.
#[derive(Debug)]
pub struct ApiContext {
    raw: Arc<Value>,
    req: ApiRequest,
    /// The response builder exported at the end of the invocation.
    pub res: ApiResponse,
    /// Structured logger for this invocation.
    pub log: Logger,
    extra: JsonMap,
}

impl ApiContext {
    /// Creates a context with a fresh 200 response.
    pub fn new(raw: Arc<Value>, req: ApiRequest, mut log: Logger, extra: JsonMap) -> Self {
        let res = ApiResponse::new();
        log.set_response(serde_json::to_value(res.export()).ok());
        Self {
            raw,
            req,
            res,
            log,
            extra,
        }
    }

    /// A context with no raw event, extras or logging. Handy in tests.
    #[must_use]
    pub fn for_request(req: ApiRequest) -> Self {
        Self::new(Arc::new(Value::Null), req, Logger::disabled(), JsonMap::new())
    }

    /// The translated request.
    pub fn req(&self) -> &ApiRequest {
        &self.req
    }
}

context_common!(ApiContext);

impl InvocationContext for ApiContext {
    type Response = ApiResponse;
    const KIND: EventKind = EventKind::Api;

    fn logger(&self) -> &Logger {
        &self.log
    }

    fn logger_mut(&mut self) -> &mut Logger {
        &mut self.log
    }

    fn response_snapshot(&self) -> Option<Value> {
        serde_json::to_value(self.res.export()).ok()
    }

    fn raw(&self) -> &Value {
        &self.raw
    }

    fn extra(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// Context for a queue invocation.
#[derive(Debug)]
pub struct QueueContext {
    raw: Arc<Value>,
    event: QueueEvent,
    /// The body-only response, initially unset.
    pub res: QueueResponse,
    /// Structured logger for this invocation.
    pub log: Logger,
    extra: JsonMap,
}

impl QueueContext {
    /// Creates a context with an unset response.
    pub fn new(raw: Arc<Value>, event: QueueEvent, log: Logger, extra: JsonMap) -> Self {
        Self {
            raw,
            event,
            res: QueueResponse::new(),
            log,
            extra,
        }
    }

    /// A context with no raw event, extras or logging.
    #[must_use]
    pub fn for_event(event: QueueEvent) -> Self {
        Self::new(Arc::new(Value::Null), event, Logger::disabled(), JsonMap::new())
    }

    /// The translated message.
    pub fn event(&self) -> &QueueEvent {
        &self.event
    }
}

context_common!(QueueContext);

impl InvocationContext for QueueContext {
    type Response = QueueResponse;
    const KIND: EventKind = EventKind::Queue;

    fn logger(&self) -> &Logger {
        &self.log
    }

    fn logger_mut(&mut self) -> &mut Logger {
        &mut self.log
    }

    fn response_snapshot(&self) -> Option<Value> {
        self.res.export().map(Value::String)
    }

    fn raw(&self) -> &Value {
        &self.raw
    }

    fn extra(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// Context for a bus invocation. There is no response.
#[derive(Debug)]
pub struct BusContext {
    raw: Arc<Value>,
    event: BusEvent,
    /// Structured logger for this invocation.
    pub log: Logger,
    extra: JsonMap,
}

impl BusContext {
    /// Creates a context.
    pub fn new(raw: Arc<Value>, event: BusEvent, log: Logger, extra: JsonMap) -> Self {
        Self {
            raw,
            event,
            log,
            extra,
        }
    }

    /// A context with no raw event, extras or logging.
    #[must_use]
    pub fn for_event(event: BusEvent) -> Self {
        Self::new(Arc::new(Value::Null), event, Logger::disabled(), JsonMap::new())
    }

    /// The translated notification.
    pub fn event(&self) -> &BusEvent {
        &self.event
    }
}

context_common!(BusContext);

impl InvocationContext for BusContext {
    type Response = ();
    const KIND: EventKind = EventKind::Bus;

    fn logger(&self) -> &Logger {
        &self.log
    }

    fn logger_mut(&mut self) -> &mut Logger {
        &mut self.log
    }

    fn response_snapshot(&self) -> Option<Value> {
        None
    }

    fn raw(&self) -> &Value {
        &self.raw
    }

    fn extra(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}
