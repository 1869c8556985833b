//! Core runtime for Graphite: layered configuration and tracing setup.
//!
//! ```ignore
//! use graphite_core::{init_tracing_with, GraphiteConfig, LogConfig};
//!
//! let config = GraphiteConfig::load("dev")?;
//! init_tracing_with(&config.clone().with_typed::<LogConfig>()?);
//! let url: String = config.get("graphite.datasource.url")?;
//! ```

pub mod config;
pub mod logging;

pub use config::{ConfigError, ConfigProperties, ConfigValue, FromConfigValue, GraphiteConfig};
pub use logging::{init_tracing, init_tracing_with, LogConfig, LogFormat, DEFAULT_FILTER};
