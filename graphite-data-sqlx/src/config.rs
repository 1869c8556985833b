use std::collections::BTreeMap;

use graphite_core::{ConfigError, ConfigProperties, FromConfigValue, GraphiteConfig};
use graphite_data::{DataError, RelationalDataProvider};

use crate::store::SqlxStore;

/// Pool size used when `graphite.datasource.connections` is not set.
pub const DEFAULT_CONNECTIONS: u32 = 5;

/// The `graphite.datasource` configuration section.
///
/// ```yaml
/// graphite:
///   datasource:
///     url: mysql://app@primary/app
///     connections: 10
///     sources:
///       replica: mysql://app@replica/app
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DataSourceConfig {
    /// URL of the default store; all writes go there.
    pub url: String,
    /// Maximum pool size, per store.
    pub connections: u32,
    /// Named read sources: name to URL.
    pub sources: BTreeMap<String, String>,
}

impl ConfigProperties for DataSourceConfig {
    fn prefix() -> &'static str {
        "graphite.datasource"
    }

    fn from_config(config: &GraphiteConfig) -> Result<Self, ConfigError> {
        let url = config.get(&Self::key("url"))?;
        let connections = match config.get(&Self::key("connections")) {
            Ok(n) => n,
            Err(ConfigError::NotFound(_)) => DEFAULT_CONNECTIONS,
            Err(err) => return Err(err),
        };
        let sources_key = Self::key("sources");
        let sources = config
            .children(&sources_key)
            .into_iter()
            .map(|(name, value)| {
                let url = String::from_config_value(&value, &format!("{sources_key}.{name}"))?;
                Ok((name, url))
            })
            .collect::<Result<_, ConfigError>>()?;
        Ok(DataSourceConfig {
            url,
            connections,
            sources,
        })
    }
}

/// Connect the default store and every named read source in `config`.
pub async fn provider_from_config(
    config: &DataSourceConfig,
) -> Result<RelationalDataProvider<SqlxStore>, DataError> {
    let mut provider = RelationalDataProvider::new(SqlxStore::from_config(config).await?);
    for (name, url) in &config.sources {
        tracing::info!(source = %name, "registering read source");
        let store = SqlxStore::connect_with(url, config.connections).await?;
        provider = provider.with_source(name.clone(), store);
    }
    Ok(provider)
}
