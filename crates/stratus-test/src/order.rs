//! Phase ordering probes.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use stratus_core::InvocationContext;
use stratus_middleware::{Middleware, Outcome};

/// A shared log of `"<name>.<phase>"` entries.
///
/// # Example
///
/// ```
/// use stratus_core::BusContext;
/// use stratus_middleware::Phase;
/// use stratus_test::OrderLog;
///
/// let order = OrderLog::new();
/// let mw = order.recording::<BusContext>("E1");
/// assert_eq!(mw.name(), "E1");
/// assert!(mw.has(Phase::Before) && mw.has(Phase::After) && mw.has(Phase::OnError));
/// assert!(order.entries().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct OrderLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl OrderLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn push(&self, entry: impl Into<String>) {
        self.lock().push(entry.into());
    }

    /// A copy of the entries, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// A middleware that fills all three slots, records each call and
    /// always continues.
    pub fn recording<C: InvocationContext>(&self, name: &str) -> Middleware<C> {
        let (before, after, on_error) = (self.clone(), self.clone(), self.clone());
        let (b, a, e) = (
            format!("{name}.before"),
            format!("{name}.after"),
            format!("{name}.on_error"),
        );

        Middleware::<C>::new(name)
            .before(move |_ctx| {
                before.push(b.clone());
                Box::pin(async { Ok(Outcome::Next) })
            })
            .after(move |_ctx| {
                after.push(a.clone());
                Box::pin(async { Ok(Outcome::Next) })
            })
            .on_error(move |_err, _ctx| {
                on_error.push(e.clone());
                Box::pin(async { Ok(Outcome::Next) })
            })
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
