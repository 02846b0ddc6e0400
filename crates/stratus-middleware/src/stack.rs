//! Ordered execution of middleware phases.

use std::fmt;
use std::sync::Arc;

use stratus_core::{BoxError, InvocationContext};

use crate::middleware::{ErrorRef, Middleware, Outcome, Phase};

/// The resolved middleware list for one endpoint.
///
/// Order is fixed at construction: endpoint-level middlewares first, then the
/// global ones. Every phase walks the list in that order and skips entries
/// whose slot for the phase is empty. Phases run sequentially; each slot is
/// awaited before the next one starts.
pub struct MiddlewareStack<C: InvocationContext> {
    middlewares: Arc<[Middleware<C>]>,
}

impl<C: InvocationContext> Clone for MiddlewareStack<C> {
    fn clone(&self) -> Self {
        Self {
            middlewares: Arc::clone(&self.middlewares),
        }
    }
}

impl<C: InvocationContext> fmt::Debug for MiddlewareStack<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareStack")
            .field("middlewares", &self.names())
            .finish()
    }
}

impl<C: InvocationContext> Default for MiddlewareStack<C> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<C: InvocationContext> MiddlewareStack<C> {
    /// Creates a stack from an already ordered list.
    pub fn new(middlewares: Vec<Middleware<C>>) -> Self {
        Self {
            middlewares: middlewares.into(),
        }
    }

    /// Combines endpoint-level and global middlewares, endpoint-level first.
    pub fn compose(endpoint: Vec<Middleware<C>>, global: &[Middleware<C>]) -> Self {
        let mut middlewares = endpoint;
        middlewares.extend(global.iter().cloned());
        Self::new(middlewares)
    }

    /// Number of middlewares.
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    /// Returns true if the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Names in execution order.
    pub fn names(&self) -> Vec<&str> {
        self.middlewares.iter().map(Middleware::name).collect()
    }

    /// Number of middlewares taking part in `phase`.
    pub fn count(&self, phase: Phase) -> usize {
        self.middlewares.iter().filter(|mw| mw.has(phase)).count()
    }

    /// Runs the `before` phase.
    ///
    /// Returns the first response a middleware short-circuits with. An error
    /// stops the phase and is returned as is.
    pub async fn run_before(&self, ctx: &mut C) -> Result<Option<C::Response>, BoxError> {
        self.run_hooks(Phase::Before, ctx).await
    }

    /// Runs the `after` phase. Same rules as [`run_before`](Self::run_before).
    pub async fn run_after(&self, ctx: &mut C) -> Result<Option<C::Response>, BoxError> {
        self.run_hooks(Phase::After, ctx).await
    }

    async fn run_hooks(&self, phase: Phase, ctx: &mut C) -> Result<Option<C::Response>, BoxError> {
        for mw in self.middlewares.iter() {
            ctx.enter(phase.source());
            let Some(fut) = mw.call_hook(phase, ctx) else {
                continue;
            };
            tracing::trace!(kind = %C::KIND, middleware = mw.name(), %phase, "running middleware");

            if let Outcome::Respond(res) = fut.await? {
                tracing::debug!(kind = %C::KIND, middleware = mw.name(), %phase, "middleware short-circuited");
                return Ok(Some(res));
            }
        }
        Ok(None)
    }

    /// Runs the `on_error` phase until a middleware responds.
    ///
    /// Returns `Ok(None)` when every middleware passed. An error raised by an
    /// `on_error` slot stops the phase and is returned.
    pub async fn run_on_error(
        &self,
        err: &ErrorRef,
        ctx: &mut C,
    ) -> Result<Option<C::Response>, BoxError> {
        for mw in self.middlewares.iter() {
            ctx.enter(Phase::OnError.source());
            let Some(fut) = mw.call_on_error(err, ctx) else {
                continue;
            };
            tracing::trace!(kind = %C::KIND, middleware = mw.name(), "running on_error middleware");

            if let Outcome::Respond(res) = fut.await? {
                tracing::debug!(kind = %C::KIND, middleware = mw.name(), "on_error middleware recovered");
                return Ok(Some(res));
            }
        }
        Ok(None)
    }

    /// Runs every `on_error` slot regardless of what each returns.
    ///
    /// Responses are discarded. Errors raised by the slots are collected and
    /// returned in order; they never stop the phase.
    pub async fn run_on_error_all(&self, err: &ErrorRef, ctx: &mut C) -> Vec<BoxError> {
        let mut failures = Vec::new();
        for mw in self.middlewares.iter() {
            ctx.enter(Phase::OnError.source());
            let Some(fut) = mw.call_on_error(err, ctx) else {
                continue;
            };
            tracing::trace!(kind = %C::KIND, middleware = mw.name(), "running on_error middleware");

            if let Err(failure) = fut.await {
                failures.push(failure);
            }
        }
        failures
    }
}
