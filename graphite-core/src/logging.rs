use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::{ConfigError, ConfigProperties, GraphiteConfig};

/// Filter used when neither `RUST_LOG` nor `graphite.log.filter` is set:
/// statements issued by the data layer are logged at debug level.
pub const DEFAULT_FILTER: &str = "info,graphite_data=debug";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// The `graphite.log` configuration section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogConfig {
    /// `pretty` or `json`.
    pub format: LogFormat,
    /// An `EnvFilter` directive; `RUST_LOG` still takes precedence.
    pub filter: Option<String>,
}

impl ConfigProperties for LogConfig {
    fn prefix() -> &'static str {
        "graphite.log"
    }

    fn from_config(config: &GraphiteConfig) -> Result<Self, ConfigError> {
        let format = match config.get::<Option<String>>(&Self::key("format")) {
            Ok(Some(name)) => match name.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" => LogFormat::Pretty,
                _ => {
                    return Err(ConfigError::TypeMismatch {
                        key: Self::key("format"),
                        expected: "`pretty` or `json`",
                    })
                }
            },
            Ok(None) | Err(ConfigError::NotFound(_)) => LogFormat::Pretty,
            Err(err) => return Err(err),
        };
        let filter = match config.get::<Option<String>>(&Self::key("filter")) {
            Ok(filter) => filter,
            Err(ConfigError::NotFound(_)) => None,
            Err(err) => return Err(err),
        };
        Ok(LogConfig { format, filter })
    }
}

/// Install the global `tracing` subscriber with pretty output and the
/// default filter.
///
/// Does nothing if a global subscriber is already installed.
pub fn init_tracing() {
    init_tracing_with(&LogConfig::default());
}

/// Install the global `tracing` subscriber described by `config`.
///
/// `RUST_LOG` overrides the configured filter. Does nothing if a global
/// subscriber is already installed.
pub fn init_tracing_with(config: &LogConfig) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.filter.as_deref().unwrap_or(DEFAULT_FILTER))
    });

    let installed = match config.format {
        LogFormat::Json => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false);
            Registry::default().with(env_filter).with(fmt_layer).try_init()
        }
        LogFormat::Pretty => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false);
            Registry::default().with(env_filter).with(fmt_layer).try_init()
        }
    };
    if installed.is_ok() {
        tracing::debug!(format = ?config.format, "tracing initialised");
    }
}
