//! Typed configuration for Stratus.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides (`STRATUS__SECTION__KEY`)
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Configuration File Format
//!
//! ```toml
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! service_name = "orders"
//!
//! # Merged into every invocation context
//! [context]
//! table = "orders"
//!
//! # Attached to every log record
//! [environment]
//! stage = "prod"
//! ```
//!
//! # Example
//!
//! ```no_run
//! use stratus_config::ConfigLoader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::new()
//!     .with_optional_file("stratus.toml")?
//!     .with_env_prefix("STRATUS")
//!     .load()?;
//!
//! stratus_telemetry::init_logging(&config.logging.to_log_config())?;
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/stratus-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::StratusConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{LogFormat, LoggingSection};
