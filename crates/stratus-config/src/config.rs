//! Root configuration type.

use serde::{Deserialize, Serialize};
use stratus_core::JsonMap;
use stratus_telemetry::create_env_filter;

use crate::{ConfigError, LogFormat, LoggingSection};

/// Root configuration for a Stratus deployment.
///
/// Unknown fields are rejected at every level.
///
/// - `logging` configures the global `tracing` subscriber
/// - `context` holds static fields merged into every invocation context
/// - `environment` holds metadata attached to every log record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StratusConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingSection,

    /// Static context fields.
    #[serde(default)]
    pub context: JsonMap,

    /// Log environment metadata.
    #[serde(default)]
    pub environment: JsonMap,
}

impl StratusConfig {
    /// Human-readable debug logging.
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config
    }

    /// JSON info logging.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }

    /// Checks values serde cannot check.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an unparsable log filter or an
    /// empty service name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        create_env_filter(&self.logging.level)
            .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;

        if self.logging.service_name.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "logging.service_name",
                "must not be empty",
            ));
        }

        Ok(())
    }
}
