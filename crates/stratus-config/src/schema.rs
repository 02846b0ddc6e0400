//! Configuration sections.

use serde::{Deserialize, Serialize};
use stratus_telemetry::LogConfig;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Multi-line human-readable output.
    Pretty,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// Whether the global subscriber is installed.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive, e.g. `info` or `stratus=debug,warn`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Service name attached to every record.
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::Json,
            service_name: default_service_name(),
        }
    }
}

impl LoggingSection {
    /// Converts the section into the telemetry crate's configuration.
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            json_format: self.format == LogFormat::Json,
            file_line_info: self.format == LogFormat::Pretty,
            service_name: self.service_name.clone(),
            ..LogConfig::default()
        }
    }
}

const fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_service_name() -> String {
    "stratus".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_defaults() {
        let section = LoggingSection::default();
        assert!(section.enabled);
        assert_eq!(section.level, "info");
        assert_eq!(section.format, LogFormat::Json);
    }

    #[test]
    fn test_partial_section_uses_defaults() {
        let section: LoggingSection = toml::from_str("level = \"debug\"").unwrap();
        assert_eq!(section.level, "debug");
        assert!(section.enabled);
        assert_eq!(section.service_name, "stratus");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<LoggingSection, _> = toml::from_str("colour = true");
        assert!(result.is_err());
    }

    #[test]
    fn test_to_log_config() {
        let section = LoggingSection {
            format: LogFormat::Pretty,
            level: "warn".into(),
            ..LoggingSection::default()
        };
        let config = section.to_log_config();
        assert!(!config.json_format);
        assert!(config.file_line_info);
        assert_eq!(config.level, "warn");
    }
}
