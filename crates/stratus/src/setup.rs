//! Setup options and the handler factory.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use stratus_config::StratusConfig;
use stratus_core::{
    ApiContext, BoxError, BusContext, InvocationContext, JsonMap, LogSink, NoopSink, Provider,
    QueueContext,
};
use stratus_middleware::{BoxFuture, Middleware, MiddlewareStack};
use stratus_telemetry::{describe_metrics, TracingSink};

use crate::handler::{ApiHandler, BusHandler, Callback, Pipeline, QueueHandler};

/// Per-kind overrides: a provider and globally configured middlewares.
pub struct EndpointOptions<C: InvocationContext> {
    provider: Option<Arc<dyn Provider>>,
    middlewares: Vec<Middleware<C>>,
}

impl<C: InvocationContext> Default for EndpointOptions<C> {
    fn default() -> Self {
        Self {
            provider: None,
            middlewares: Vec::new(),
        }
    }
}

impl<C: InvocationContext> Clone for EndpointOptions<C> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            middlewares: self.middlewares.clone(),
        }
    }
}

impl<C: InvocationContext> fmt::Debug for EndpointOptions<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointOptions")
            .field("provider", &self.provider.as_ref().map(|p| p.name().to_string()))
            .field("middlewares", &self.middlewares)
            .finish()
    }
}

impl<C: InvocationContext> EndpointOptions<C> {
    /// No overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `provider` instead of the default one for this kind.
    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn Provider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Appends a global middleware for this kind.
    #[must_use]
    pub fn middleware(mut self, middleware: impl Into<Middleware<C>>) -> Self {
        self.middlewares.push(middleware.into());
        self
    }

    /// Appends several global middlewares for this kind.
    #[must_use]
    pub fn middlewares(mut self, middlewares: impl IntoIterator<Item = Middleware<C>>) -> Self {
        self.middlewares.extend(middlewares);
        self
    }

    /// The global middlewares, in run order.
    pub fn middleware_list(&self) -> &[Middleware<C>] {
        &self.middlewares
    }
}

/// Everything resolved once at setup time.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use stratus::prelude::*;
/// use stratus_test::MockProvider;
///
/// let options = SetupOptions::builder(Arc::new(MockProvider::new()))
///     .api(EndpointOptions::new().middleware(CorsMiddleware::builder().build()))
///     .context("table", "orders")
///     .environment("stage", "test")
///     .build();
///
/// assert_eq!(options.context_fields()["table"], "orders");
/// assert_eq!(options.provider().name(), "mock");
/// ```
#[derive(Clone)]
pub struct SetupOptions {
    provider: Arc<dyn Provider>,
    api: EndpointOptions<ApiContext>,
    queue: EndpointOptions<QueueContext>,
    bus: EndpointOptions<BusContext>,
    context: JsonMap,
    environment: JsonMap,
    log_sink: Arc<dyn LogSink>,
}

impl fmt::Debug for SetupOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetupOptions")
            .field("provider", &self.provider.name())
            .field("api", &self.api)
            .field("queue", &self.queue)
            .field("bus", &self.bus)
            .field("context", &self.context)
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}

impl SetupOptions {
    /// Starts a builder around the default provider.
    #[must_use]
    pub fn builder(provider: Arc<dyn Provider>) -> SetupOptionsBuilder {
        SetupOptionsBuilder {
            options: Self {
                provider,
                api: EndpointOptions::new(),
                queue: EndpointOptions::new(),
                bus: EndpointOptions::new(),
                context: JsonMap::new(),
                environment: JsonMap::new(),
                log_sink: Arc::new(TracingSink::default()),
            },
        }
    }

    /// The default provider.
    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    /// Static fields merged into every context.
    pub fn context_fields(&self) -> &JsonMap {
        &self.context
    }

    /// Static log metadata.
    pub fn environment(&self) -> &JsonMap {
        &self.environment
    }
}

/// Builder for [`SetupOptions`].
#[derive(Debug)]
pub struct SetupOptionsBuilder {
    options: SetupOptions,
}

impl SetupOptionsBuilder {
    /// API overrides.
    #[must_use]
    pub fn api(mut self, api: EndpointOptions<ApiContext>) -> Self {
        self.options.api = api;
        self
    }

    /// Queue overrides.
    #[must_use]
    pub fn queue(mut self, queue: EndpointOptions<QueueContext>) -> Self {
        self.options.queue = queue;
        self
    }

    /// Bus overrides.
    #[must_use]
    pub fn bus(mut self, bus: EndpointOptions<BusContext>) -> Self {
        self.options.bus = bus;
        self
    }

    /// Adds a static context field.
    #[must_use]
    pub fn context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.context.insert(key.into(), value.into());
        self
    }

    /// Adds several static context fields.
    #[must_use]
    pub fn context_map(mut self, fields: JsonMap) -> Self {
        self.options.context.extend(fields);
        self
    }

    /// Adds a log metadata entry.
    #[must_use]
    pub fn environment(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.environment.insert(key.into(), value.into());
        self
    }

    /// Replaces the log sink. Defaults to [`TracingSink`].
    #[must_use]
    pub fn log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.options.log_sink = sink;
        self
    }

    /// Applies a loaded configuration.
    ///
    /// Copies the `context` and `environment` tables and picks the log sink:
    /// a [`TracingSink`] named after `logging.service_name`, or a sink that
    /// drops everything when logging is disabled.
    #[must_use]
    pub fn config(mut self, config: &StratusConfig) -> Self {
        self.options.context.extend(config.context.clone());
        self.options.environment.extend(config.environment.clone());
        self.options.log_sink = if config.logging.enabled {
            Arc::new(TracingSink::new(config.logging.service_name.clone()))
        } else {
            Arc::new(NoopSink)
        };
        self
    }

    /// Finishes the options.
    #[must_use]
    pub fn build(self) -> SetupOptions {
        self.options
    }
}

/// Produces API, queue and bus handlers that share one [`SetupOptions`].
///
/// Endpoint-level middlewares passed to the `*_with` methods run before the
/// globally configured ones for the same kind.
#[derive(Debug, Clone)]
pub struct EventHandlerSetup {
    options: SetupOptions,
}

impl EventHandlerSetup {
    /// Creates the factory and registers metric descriptions.
    #[must_use]
    pub fn new(options: SetupOptions) -> Self {
        describe_metrics();
        Self { options }
    }

    /// The options handlers are built from.
    pub fn options(&self) -> &SetupOptions {
        &self.options
    }

    /// An API handler with only the global middlewares.
    pub fn api<F>(&self, callback: F) -> ApiHandler
    where
        F: for<'a> Fn(&'a mut ApiContext) -> BoxFuture<'a, Result<(), BoxError>>
            + Send
            + Sync
            + 'static,
    {
        self.api_with(Vec::new(), callback)
    }

    /// An API handler with endpoint-level middlewares.
    pub fn api_with<F>(&self, middlewares: Vec<Middleware<ApiContext>>, callback: F) -> ApiHandler
    where
        F: for<'a> Fn(&'a mut ApiContext) -> BoxFuture<'a, Result<(), BoxError>>
            + Send
            + Sync
            + 'static,
    {
        ApiHandler::new(self.pipeline(&self.options.api, middlewares, Arc::new(callback)))
    }

    /// A queue handler with only the global middlewares.
    pub fn queue<F>(&self, callback: F) -> QueueHandler
    where
        F: for<'a> Fn(&'a mut QueueContext) -> BoxFuture<'a, Result<(), BoxError>>
            + Send
            + Sync
            + 'static,
    {
        self.queue_with(Vec::new(), callback)
    }

    /// A queue handler with endpoint-level middlewares.
    pub fn queue_with<F>(
        &self,
        middlewares: Vec<Middleware<QueueContext>>,
        callback: F,
    ) -> QueueHandler
    where
        F: for<'a> Fn(&'a mut QueueContext) -> BoxFuture<'a, Result<(), BoxError>>
            + Send
            + Sync
            + 'static,
    {
        QueueHandler::new(self.pipeline(&self.options.queue, middlewares, Arc::new(callback)))
    }

    /// A bus handler with only the global middlewares.
    pub fn bus<F>(&self, callback: F) -> BusHandler
    where
        F: for<'a> Fn(&'a mut BusContext) -> BoxFuture<'a, Result<(), BoxError>>
            + Send
            + Sync
            + 'static,
    {
        self.bus_with(Vec::new(), callback)
    }

    /// A bus handler with endpoint-level middlewares.
    pub fn bus_with<F>(&self, middlewares: Vec<Middleware<BusContext>>, callback: F) -> BusHandler
    where
        F: for<'a> Fn(&'a mut BusContext) -> BoxFuture<'a, Result<(), BoxError>>
            + Send
            + Sync
            + 'static,
    {
        BusHandler::new(self.pipeline(&self.options.bus, middlewares, Arc::new(callback)))
    }

    fn pipeline<C: InvocationContext>(
        &self,
        endpoint: &EndpointOptions<C>,
        middlewares: Vec<Middleware<C>>,
        callback: Callback<C>,
    ) -> Pipeline<C> {
        let provider = endpoint
            .provider
            .clone()
            .unwrap_or_else(|| self.options.provider.clone());
        let stack = MiddlewareStack::compose(middlewares, &endpoint.middlewares);
        tracing::debug!(
            kind = %C::KIND,
            provider = provider.name(),
            middlewares = ?stack.names(),
            "handler created"
        );

        Pipeline::new(
            provider,
            stack,
            callback,
            self.options.context.clone(),
            &self.options.environment,
            self.options.log_sink.clone(),
        )
    }
}
