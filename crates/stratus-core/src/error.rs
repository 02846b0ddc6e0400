//! Error types for Stratus.
//!
//! User callbacks and middleware phases fail with a [`BoxError`]; the engine
//! never wraps it, so queue and bus callers receive exactly the error that was
//! raised. [`ProviderError`] covers translation failures on events that are
//! structurally unusable (a queue payload with no records, for example).

use thiserror::Error;

/// A boxed error type for callback and middleware failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias using [`ProviderError`].
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors raised by a provider while translating a raw event.
///
/// Malformed *bodies* are not errors: providers fall back to the raw string.
/// These variants are reserved for events whose envelope cannot be read.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The raw event does not match the provider's expected envelope.
    #[error("malformed {kind} event: {reason}")]
    MalformedEvent {
        /// The event kind being translated (`api`, `queue`, `bus`).
        kind: &'static str,
        /// Why the event could not be translated.
        reason: String,
    },

    /// The raw event has no records to translate.
    #[error("{kind} event contains no records")]
    NoRecords {
        /// The event kind being translated.
        kind: &'static str,
    },

    /// The raw event could not be deserialized into the provider's event type.
    #[error("failed to deserialize {kind} event: {source}")]
    Deserialize {
        /// The event kind being translated.
        kind: &'static str,
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },
}

impl ProviderError {
    /// Creates a malformed event error.
    #[must_use]
    pub fn malformed(kind: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedEvent {
            kind,
            reason: reason.into(),
        }
    }

    /// Creates a deserialization error.
    #[must_use]
    pub fn deserialize(kind: &'static str, source: serde_json::Error) -> Self {
        Self::Deserialize { kind, source }
    }
}
