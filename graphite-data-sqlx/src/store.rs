use graphite_data::{DataError, Execution, Row, StoreConnection};
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use sqlx::MySql;

use crate::config::{DataSourceConfig, DEFAULT_CONNECTIONS};
use crate::decode::decode_row;
use crate::error::SqlxErrorExt;

/// [`StoreConnection`] backed by an `sqlx` MySQL pool.
///
/// Each statement runs on whichever pooled connection is free; the
/// generated identity is read from that statement's own result.
///
/// Literals are inlined, so statements are never cached as prepared.
///
/// # Example
///
/// ```ignore
/// let store = SqlxStore::connect("mysql://root@localhost/app").await?;
/// let provider = RelationalDataProvider::new(store);
/// ```
#[derive(Debug, Clone)]
pub struct SqlxStore {
    pool: MySqlPool,
}

impl SqlxStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str) -> Result<Self, DataError> {
        Self::connect_with(url, DEFAULT_CONNECTIONS).await
    }

    pub async fn connect_with(url: &str, max_connections: u32) -> Result<Self, DataError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(SqlxErrorExt::into_data_error)?;
        tracing::info!(max_connections, "connected MySQL pool");
        Ok(Self::new(pool))
    }

    /// Connect the default data source described by `config`.
    pub async fn from_config(config: &DataSourceConfig) -> Result<Self, DataError> {
        Self::connect_with(&config.url, config.connections).await
    }

    /// Get the underlying pool reference.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

impl StoreConnection for SqlxStore {
    async fn query(&self, sql: &str) -> Result<Vec<Row>, DataError> {
        let rows = sqlx::query::<MySql>(sql)
            .persistent(false)
            .fetch_all(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_data_error)?;
        rows.iter()
            .map(decode_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(SqlxErrorExt::into_data_error)
    }

    async fn execute(&self, sql: &str) -> Result<Execution, DataError> {
        let result = sqlx::query::<MySql>(sql)
            .persistent(false)
            .execute(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_data_error)?;
        Ok(Execution {
            rows_affected: result.rows_affected(),
            last_insert_id: result.last_insert_id(),
        })
    }
}
