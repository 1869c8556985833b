//! # graphite-data-sqlx: SQLx backend for the Graphite data layer
//!
//! Provides a MySQL [`StoreConnection`](graphite_data::StoreConnection)
//! backed by an [SQLx](https://github.com/launchbadge/sqlx) pool, so a
//! [`RelationalDataProvider`](graphite_data::RelationalDataProvider) can talk
//! to a real database.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SqlxStore`] | `StoreConnection` over a `sqlx::MySqlPool` |
//! | [`DataSourceConfig`] | The `graphite.datasource` config section |
//! | [`provider_from_config`] | Provider with the default store and every configured read source |
//! | [`SqlxErrorExt`] | `sqlx::Error` → `DataError` (`.into_data_error()`) |
//!
//! Rows are decoded column by column: integers, floats, strings and JSON
//! keep their type; dates and times become `%Y-%m-%d %H:%M:%S` style
//! strings; binary columns become lossy UTF-8.
//!
//! ```ignore
//! use graphite_core::GraphiteConfig;
//! use graphite_data_sqlx::{provider_from_config, DataSourceConfig};
//!
//! let config = GraphiteConfig::load("dev")?.with_typed::<DataSourceConfig>()?;
//! let provider = provider_from_config(&config).await?;
//! ```

pub mod config;
mod decode;
pub mod error;
pub mod store;

pub use config::{provider_from_config, DataSourceConfig, DEFAULT_CONNECTIONS};
pub use error::{SqlxErrorExt, SqlxResult};
pub use store::SqlxStore;

/// Re-exports of the most commonly used types from both `graphite-data` and this crate.
pub mod prelude {
    pub use crate::{provider_from_config, DataSourceConfig, SqlxErrorExt, SqlxStore};
    pub use graphite_data::prelude::*;
}
