use super::{ConfigError, GraphiteConfig};

/// A strongly-typed configuration section read from the keys under
/// [`prefix`](Self::prefix).
///
/// ```ignore
/// pub struct PoolConfig { pub size: u32 }
///
/// impl ConfigProperties for PoolConfig {
///     fn prefix() -> &'static str { "app.pool" }
///
///     fn from_config(config: &GraphiteConfig) -> Result<Self, ConfigError> {
///         Ok(Self { size: config.get_or(&Self::key("size"), 10) })
///     }
/// }
/// ```
pub trait ConfigProperties: Sized {
    /// The configuration key prefix (e.g. `"graphite.datasource"`).
    fn prefix() -> &'static str;

    fn from_config(config: &GraphiteConfig) -> Result<Self, ConfigError>;

    /// Absolute key of the property `name` in this section.
    fn key(name: &str) -> String {
        format!("{}.{name}", Self::prefix())
    }
}
