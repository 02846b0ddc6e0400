//! The middleware contract.
//!
//! A middleware is a named value with three optional phase slots. Each slot
//! is an async function over the invocation context; an empty slot means the
//! middleware does not take part in that phase.
//!
//! Phase functions return a boxed future borrowing the context, so closures
//! are written as `|ctx| Box::pin(async move { .. })`.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use stratus_core::{BoxError, InvocationContext};

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The error an `on_error` phase receives.
pub type ErrorRef = dyn std::error::Error + Send + Sync + 'static;

/// What a phase function produces.
pub type PhaseResult<C> = Result<Outcome<<C as InvocationContext>::Response>, BoxError>;

type HookFn<C> = dyn for<'a> Fn(&'a mut C) -> BoxFuture<'a, PhaseResult<C>> + Send + Sync;
type ErrorFn<C> =
    dyn for<'a> Fn(&'a ErrorRef, &'a mut C) -> BoxFuture<'a, PhaseResult<C>> + Send + Sync;

/// Result of a single phase function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<R> {
    /// Continue with the next middleware.
    Next,
    /// Stop the phase and use this response.
    Respond(R),
}

impl<R: Clone> Outcome<R> {
    /// Short-circuits with a copy of `res`.
    ///
    /// Typically called as `Outcome::respond(&ctx.res)` after mutating the
    /// context's response.
    pub fn respond(res: &R) -> Self {
        Self::Respond(res.clone())
    }
}

impl<R> Outcome<R> {
    /// Returns true for [`Outcome::Respond`].
    pub const fn is_respond(&self) -> bool {
        matches!(self, Self::Respond(_))
    }

    /// Returns the response, if any.
    pub fn into_response(self) -> Option<R> {
        match self {
            Self::Next => None,
            Self::Respond(res) => Some(res),
        }
    }
}

/// The three middleware phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Before the user callback.
    Before,
    /// After the user callback.
    After,
    /// When the user callback fails.
    OnError,
}

impl Phase {
    /// Source tag written to log records while the phase runs.
    #[must_use]
    pub const fn source(self) -> &'static str {
        match self {
            Self::Before => "middleware.before",
            Self::After => "middleware.after",
            Self::OnError => "middleware.on_error",
        }
    }

    /// Source tag written while the user callback runs.
    pub const CALLBACK_SOURCE: &'static str = "function";
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source())
    }
}

/// A middleware for contexts of type `C`.
///
/// # Example
///
/// ```
/// use stratus_core::QueueContext;
/// use stratus_middleware::{Middleware, Outcome, Phase};
///
/// let recover = Middleware::<QueueContext>::new("recover").on_error(|_err, ctx| {
///     Box::pin(async move {
///         ctx.res.json(serde_json::json!({"success": false}));
///         Ok(Outcome::respond(&ctx.res))
///     })
/// });
///
/// assert!(recover.has(Phase::OnError));
/// assert!(!recover.has(Phase::Before));
/// ```
pub struct Middleware<C: InvocationContext> {
    name: String,
    before: Option<Arc<HookFn<C>>>,
    after: Option<Arc<HookFn<C>>>,
    on_error: Option<Arc<ErrorFn<C>>>,
}

impl<C: InvocationContext> Clone for Middleware<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            before: self.before.clone(),
            after: self.after.clone(),
            on_error: self.on_error.clone(),
        }
    }
}

impl<C: InvocationContext> fmt::Debug for Middleware<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middleware")
            .field("name", &self.name)
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

impl<C: InvocationContext> Middleware<C> {
    /// Creates a middleware with every slot empty.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            before: None,
            after: None,
            on_error: None,
        }
    }

    /// Sets the `before` slot.
    pub fn before<F>(mut self, f: F) -> Self
    where
        F: for<'a> Fn(&'a mut C) -> BoxFuture<'a, PhaseResult<C>> + Send + Sync + 'static,
    {
        self.before = Some(Arc::new(f));
        self
    }

    /// Sets the `after` slot.
    pub fn after<F>(mut self, f: F) -> Self
    where
        F: for<'a> Fn(&'a mut C) -> BoxFuture<'a, PhaseResult<C>> + Send + Sync + 'static,
    {
        self.after = Some(Arc::new(f));
        self
    }

    /// Sets the `on_error` slot.
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: for<'a> Fn(&'a ErrorRef, &'a mut C) -> BoxFuture<'a, PhaseResult<C>>
            + Send
            + Sync
            + 'static,
    {
        self.on_error = Some(Arc::new(f));
        self
    }

    /// The middleware's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the slot for `phase` is filled.
    pub fn has(&self, phase: Phase) -> bool {
        match phase {
            Phase::Before => self.before.is_some(),
            Phase::After => self.after.is_some(),
            Phase::OnError => self.on_error.is_some(),
        }
    }

    /// Runs the `before` or `after` slot. Empty slots and `OnError` yield `None`.
    pub(crate) fn call_hook<'a>(
        &'a self,
        phase: Phase,
        ctx: &'a mut C,
    ) -> Option<BoxFuture<'a, PhaseResult<C>>> {
        let hook = match phase {
            Phase::Before => self.before.as_ref(),
            Phase::After => self.after.as_ref(),
            Phase::OnError => None,
        }?;
        Some(hook(ctx))
    }

    /// Runs the `on_error` slot, if filled.
    pub(crate) fn call_on_error<'a>(
        &'a self,
        err: &'a ErrorRef,
        ctx: &'a mut C,
    ) -> Option<BoxFuture<'a, PhaseResult<C>>> {
        self.on_error.as_ref().map(|hook| hook(err, ctx))
    }
}
