use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::DataError;
use crate::provider::DataProvider;
use crate::query::{self, FetchQuery};
use crate::record::Record;
use crate::result_set::ResultSet;
use crate::schema::Schema;
use crate::store::StoreConnection;
use crate::value::Value;

/// [`DataProvider`] that turns records into MySQL-dialect statements and
/// runs them on a [`StoreConnection`].
///
/// Holds no per-call state; share it freely as long as the store is
/// shareable.
///
/// # Example
///
/// ```ignore
/// let provider = RelationalDataProvider::new(store)
///     .with_source("replica", replica_store);
/// let mut user = User::default();
/// user.set("name", "Ann");
/// let id = provider.insert(&mut user).await?;
/// ```
pub struct RelationalDataProvider<S> {
    store: S,
    sources: HashMap<String, S>,
}

impl<S: StoreConnection> RelationalDataProvider<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            sources: HashMap::new(),
        }
    }

    /// Register a named read source.
    ///
    /// Fetches of record types whose schema names this source run on
    /// `store`; writes always use the default store.
    pub fn with_source(mut self, name: impl Into<String>, store: S) -> Self {
        self.sources.insert(name.into(), store);
        self
    }

    /// The default store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn source(&self, name: &str) -> Option<&S> {
        self.sources.get(name)
    }

    fn read_store(&self, schema: &Schema) -> &S {
        schema
            .source
            .and_then(|name| self.sources.get(name))
            .unwrap_or(&self.store)
    }

    /// Insert the record, or update the existing row when the insert hits a
    /// duplicate key (`ON DUPLICATE KEY UPDATE`).
    ///
    /// A set primary key is always written so the update arm can match on
    /// it. Returns the record's primary-key value.
    pub async fn insert_update<R: Record>(&self, record: &mut R) -> Result<Value, DataError> {
        let schema = R::schema();
        schema.assert_valid();
        if !record.is_dirty() {
            return Err(nothing_to_write(schema));
        }

        record.before_insert();
        let mut columns = record.diff();
        if record.has_pkey() && !columns.iter().any(|(name, _)| *name == schema.primary_key) {
            columns.insert(0, (schema.primary_key, record.pkey().clone()));
        }
        if columns.is_empty() {
            return Err(nothing_to_write(schema));
        }

        let sql = query::build_upsert(schema, &columns, &|raw: &str| self.store.escape(raw));
        debug!(table = schema.table, statement = %sql, "insert_update");
        let execution = self
            .store
            .execute(&sql)
            .await
            .map_err(|err| rejected(schema, "insert_update", err))?;

        if execution.last_insert_id != 0 {
            record.set(schema.primary_key, execution.last_insert_id);
        }
        record.commit_diff();
        Ok(record.pkey().clone())
    }
}

impl<S: StoreConnection> DataProvider for RelationalDataProvider<S> {
    /// Build and run the SELECT for `R`, hydrating one record per row.
    ///
    /// A store failure is an error, never an empty result.
    async fn fetch<R: Record>(&self, query: FetchQuery) -> Result<ResultSet<R>, DataError> {
        let schema = R::schema();
        schema.assert_valid();
        let store = self.read_store(schema);

        let sql = query::build_select::<R>(&query, &|raw: &str| store.escape(raw));
        debug!(table = schema.table, source = ?schema.source, statement = %sql, "fetch");
        let rows = store
            .query(&sql)
            .await
            .map_err(|err| rejected(schema, "fetch", err))?;

        let mut results = ResultSet::new();
        for row in &rows {
            let key = row.get(schema.primary_key).cloned().unwrap_or_default();
            results.insert(key, R::hydrate(row));
        }
        debug!(table = schema.table, rows = results.len(), "fetched");
        Ok(results)
    }

    async fn insert<R: Record>(&self, record: &mut R) -> Result<Value, DataError> {
        let schema = R::schema();
        schema.assert_valid();
        if !record.is_dirty() {
            return Err(nothing_to_write(schema));
        }

        // The hook may set defaults; read the diff after it.
        record.before_insert();
        let columns = record.diff();
        if columns.is_empty() {
            return Err(nothing_to_write(schema));
        }

        let sql = query::build_insert(schema, &columns, &|raw: &str| self.store.escape(raw));
        debug!(table = schema.table, statement = %sql, "insert");
        let execution = self
            .store
            .execute(&sql)
            .await
            .map_err(|err| rejected(schema, "insert", err))?;

        if execution.last_insert_id != 0 {
            record.set(schema.primary_key, execution.last_insert_id);
        }
        record.commit_diff();
        Ok(record.pkey().clone())
    }

    async fn update<R: Record>(&self, record: &mut R) -> Result<(), DataError> {
        let schema = R::schema();
        schema.assert_valid();
        if !record.has_pkey() {
            return Err(DataError::invalid(format!(
                "cannot update `{}` without `{}`",
                schema.table, schema.primary_key
            )));
        }
        if !record.is_dirty() {
            return Err(nothing_to_write(schema));
        }

        record.before_update();
        if !record.has_pkey() {
            return Err(DataError::invalid(format!(
                "`{}` lost its `{}` in before_update",
                schema.table, schema.primary_key
            )));
        }
        let columns = record.diff();
        if columns.is_empty() {
            return Err(nothing_to_write(schema));
        }

        let sql = query::build_update(schema, &columns, record.pkey(), &|raw: &str| {
            self.store.escape(raw)
        });
        debug!(table = schema.table, statement = %sql, "update");
        self.store
            .execute(&sql)
            .await
            .map_err(|err| rejected(schema, "update", err))?;

        record.commit_diff();
        Ok(())
    }

    async fn delete<R: Record>(&self, record: &mut R) -> Result<u64, DataError> {
        let schema = R::schema();
        schema.assert_valid();
        if !record.has_pkey() {
            return Err(DataError::invalid(format!(
                "cannot delete `{}` without `{}`",
                schema.table, schema.primary_key
            )));
        }

        record.before_delete();
        let sql = query::build_delete(schema, record.pkey(), &|raw: &str| self.store.escape(raw));
        debug!(table = schema.table, statement = %sql, "delete");
        let execution = self
            .store
            .execute(&sql)
            .await
            .map_err(|err| rejected(schema, "delete", err))?;
        Ok(execution.rows_affected)
    }
}

fn nothing_to_write(schema: &Schema) -> DataError {
    DataError::invalid(format!("no changed fields to write to `{}`", schema.table))
}

fn rejected(schema: &Schema, operation: &'static str, err: DataError) -> DataError {
    warn!(table = schema.table, operation, error = %err, "store rejected statement");
    err
}
