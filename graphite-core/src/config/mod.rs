mod loader;
pub mod typed;
pub mod value;

use std::collections::HashMap;
use std::ops::Deref;
use std::path::Path;

pub use typed::ConfigProperties;
pub use value::{ConfigValue, FromConfigValue};

/// Error type for configuration operations.
#[derive(Debug)]
pub enum ConfigError {
    /// The requested key was not found in the configuration.
    NotFound(String),
    /// The value could not be converted to the requested type.
    TypeMismatch { key: String, expected: &'static str },
    /// An I/O or YAML parsing error occurred while loading config files.
    Load(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(key) => write!(f, "Config key not found: {key}"),
            ConfigError::TypeMismatch { key, expected } => {
                write!(f, "Config type mismatch for '{key}': expected {expected}")
            }
            ConfigError::Load(msg) => write!(f, "Config load error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration loaded from YAML files, `.env` files and environment
/// variables, flattened to dot-separated keys.
///
/// `GraphiteConfig` (= `GraphiteConfig<()>`) gives raw key access only;
/// `GraphiteConfig<T>` adds a typed section through `Deref<Target = T>`.
///
/// Resolution order (lowest to highest priority):
/// 1. `application.yaml`
/// 2. `application-{profile}.yaml`
/// 3. `.env`, then `.env.{profile}` (never overwriting variables already set)
/// 4. Environment variables (`GRAPHITE_DATASOURCE_URL` overrides
///    `graphite.datasource.url`)
///
/// The `GRAPHITE_PROFILE` environment variable wins over the profile
/// argument.
#[derive(Debug, Clone)]
pub struct GraphiteConfig<T = ()> {
    values: HashMap<String, ConfigValue>,
    profile: String,
    typed: T,
}

impl GraphiteConfig {
    /// Load configuration for `profile` from the working directory.
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        Self::load_from_dir(Path::new("."), profile)
    }

    /// Load configuration for `profile` from the files in `dir`.
    pub fn load_from_dir(dir: &Path, profile: &str) -> Result<Self, ConfigError> {
        let active_profile =
            std::env::var("GRAPHITE_PROFILE").unwrap_or_else(|_| profile.to_string());

        let mut values = HashMap::new();
        loader::load_yaml_file(&dir.join("application.yaml"), &mut values)?;
        loader::load_yaml_file(
            &dir.join(format!("application-{active_profile}.yaml")),
            &mut values,
        )?;

        // Missing .env files are fine.
        let _ = dotenvy::from_path(dir.join(".env"));
        let _ = dotenvy::from_path(dir.join(format!(".env.{active_profile}")));

        loader::overlay_env(std::env::vars(), &mut values);

        tracing::debug!(profile = %active_profile, keys = values.len(), "configuration loaded");
        Ok(GraphiteConfig {
            values,
            profile: active_profile,
            typed: (),
        })
    }

    /// Create a config from a YAML string.
    pub fn from_yaml_str(yaml: &str, profile: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        loader::load_yaml_str(yaml, &mut values)?;
        Ok(GraphiteConfig {
            values,
            profile: profile.to_string(),
            typed: (),
        })
    }

    pub fn empty() -> Self {
        GraphiteConfig {
            values: HashMap::new(),
            profile: "test".to_string(),
            typed: (),
        }
    }

    pub fn set(&mut self, key: &str, value: impl Into<ConfigValue>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Attach the typed section `C`, built from the raw values.
    ///
    /// ```ignore
    /// let config = GraphiteConfig::load("dev")?.with_typed::<DataSourceConfig>()?;
    /// config.url  // typed access via Deref
    /// ```
    pub fn with_typed<C: ConfigProperties>(self) -> Result<GraphiteConfig<C>, ConfigError> {
        let typed = C::from_config(&self)?;
        Ok(GraphiteConfig {
            values: self.values,
            profile: self.profile,
            typed,
        })
    }
}

impl<T> GraphiteConfig<T> {
    /// Get the value under a dot-separated key.
    ///
    /// # Errors
    ///
    /// `ConfigError::NotFound` if the key does not exist,
    /// `ConfigError::TypeMismatch` if the value cannot be converted.
    pub fn get<V: FromConfigValue>(&self, key: &str) -> Result<V, ConfigError> {
        let value = self
            .values
            .get(key)
            .ok_or_else(|| ConfigError::NotFound(key.to_string()))?;
        V::from_config_value(value, key)
    }

    /// Like [`get`](Self::get), falling back to `default` on any error.
    pub fn get_or<V: FromConfigValue>(&self, key: &str, default: V) -> V {
        self.get(key).unwrap_or(default)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Direct children of `prefix` that hold a scalar value, keyed by the
    /// child name.
    ///
    /// With `graphite.datasource.sources.replica: mysql://...`,
    /// `children("graphite.datasource.sources")` yields `replica`.
    pub fn children(&self, prefix: &str) -> HashMap<String, ConfigValue> {
        let head = format!("{prefix}.");
        self.values
            .iter()
            .filter_map(|(key, value)| {
                let name = key.strip_prefix(&head)?;
                (!name.is_empty() && !name.contains('.')).then(|| (name.to_string(), value.clone()))
            })
            .collect()
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn typed(&self) -> &T {
        &self.typed
    }

    /// Drop the typed section.
    pub fn raw(&self) -> GraphiteConfig {
        GraphiteConfig {
            values: self.values.clone(),
            profile: self.profile.clone(),
            typed: (),
        }
    }
}

impl<T> Deref for GraphiteConfig<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.typed
    }
}
