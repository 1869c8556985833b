use std::future::Future;

use crate::error::DataError;
use crate::query::FetchQuery;
use crate::record::Record;
use crate::result_set::ResultSet;
use crate::value::{FieldType, Value};

/// Generic async data provider for single-record CRUD.
///
/// Implementors supply the primitives `fetch`, `insert` and `update`
/// (and `delete`, which has no generic fallback). The convenience
/// operations are built only on those primitives and know nothing about
/// SQL.
///
/// Every operation reports through [`DataError`]:
/// `InvalidRequest` when the call was not well-formed for the record's
/// state (nothing was sent to the store), `NotFound` when nothing matched,
/// and `Store` when the store failed; store failures propagate unchanged.
///
/// Uses RPITIT (return-position `impl Trait` in traits); no `async-trait` needed.
pub trait DataProvider: Send + Sync {
    /// Fetch records of type `R` matching `query`, keyed by primary key.
    fn fetch<R: Record>(
        &self,
        query: FetchQuery,
    ) -> impl Future<Output = Result<ResultSet<R>, DataError>> + Send;

    /// Insert the record's changed fields; returns its primary-key value.
    fn insert<R: Record>(
        &self,
        record: &mut R,
    ) -> impl Future<Output = Result<Value, DataError>> + Send;

    /// Write the record's changed fields to its row.
    fn update<R: Record>(
        &self,
        record: &mut R,
    ) -> impl Future<Output = Result<(), DataError>> + Send;

    /// Delete the record's row; returns the number of rows removed.
    ///
    /// Providers that can delete must override this.
    fn delete<R: Record>(
        &self,
        record: &mut R,
    ) -> impl Future<Output = Result<u64, DataError>> + Send {
        let _ = record;
        async move {
            Err(DataError::invalid(format!(
                "delete is not supported for `{}` by this provider",
                R::schema().table
            )))
        }
    }

    /// Fetch one record by primary key.
    ///
    /// Integer keys are coerced first, so `"5"` finds the row with id 5.
    /// Use [`by_pk_many`](Self::by_pk_many) for a list of keys.
    fn by_pk<R: Record>(
        &self,
        pkey: impl Into<Value>,
    ) -> impl Future<Output = Result<R, DataError>> + Send {
        let pkey = coerce_pkey::<R>(pkey.into());
        async move {
            let schema = R::schema();
            if matches!(pkey, Value::List(_)) {
                return Err(DataError::invalid(format!(
                    "by_pk on `{}` takes a single key; use by_pk_many for a list",
                    schema.table
                )));
            }
            let mut results = self
                .fetch::<R>(FetchQuery::new().filter(schema.primary_key, pkey.clone()))
                .await?;
            results.take(&pkey).ok_or_else(|| {
                DataError::not_found(format!(
                    "no `{}` row with `{}` = {}",
                    schema.table,
                    schema.primary_key,
                    pkey.to_text().unwrap_or_else(|| "NULL".into())
                ))
            })
        }
    }

    /// Fetch every record whose primary key is in `pkeys`.
    ///
    /// Keys without a row are simply absent from the result.
    fn by_pk_many<R: Record>(
        &self,
        pkeys: Vec<Value>,
    ) -> impl Future<Output = Result<ResultSet<R>, DataError>> + Send {
        let pkeys = coerce_pkey::<R>(Value::List(pkeys));
        async move {
            self.fetch::<R>(FetchQuery::new().filter(R::schema().primary_key, pkeys))
                .await
        }
    }

    /// Get the record with primary key `pkey`, inserting it first if no
    /// row exists.
    ///
    /// `pkey` must be numeric. The existence check and the insert are two
    /// statements: concurrent callers can both insert unless the store
    /// enforces uniqueness on the primary key.
    fn provide<R: Record>(
        &self,
        pkey: impl Into<Value>,
    ) -> impl Future<Output = Result<R, DataError>> + Send {
        let pkey = pkey.into();
        async move {
            let schema = R::schema();
            if !pkey.is_numeric() {
                return Err(DataError::invalid(format!(
                    "`{}` needs a numeric primary key to provide a record",
                    schema.table
                )));
            }
            let mut record = R::with_pkey(pkey);
            let mut results = self
                .fetch::<R>(FetchQuery::new().filter(schema.primary_key, record.pkey().clone()))
                .await?;
            match results.take(record.pkey()) {
                Some(found) => Ok(found),
                None => {
                    self.insert(&mut record).await?;
                    Ok(record)
                }
            }
        }
    }

    /// `fill` when the primary key is unset, `select` otherwise.
    fn load<R: Record>(
        &self,
        record: &mut R,
    ) -> impl Future<Output = Result<(), DataError>> + Send {
        async move {
            if record.has_pkey() {
                self.select(record).await
            } else {
                self.fill(record).await
            }
        }
    }

    /// Reload `record` from its row, by primary key.
    ///
    /// On a miss the record is left untouched.
    fn select<R: Record>(
        &self,
        record: &mut R,
    ) -> impl Future<Output = Result<(), DataError>> + Send {
        async move {
            let schema = R::schema();
            if !record.has_pkey() {
                return Err(DataError::invalid(format!(
                    "cannot select `{}` without `{}`",
                    schema.table, schema.primary_key
                )));
            }
            let results = self
                .fetch::<R>(FetchQuery::new().filter(schema.primary_key, record.pkey().clone()))
                .await?;
            match results.into_first() {
                Some(found) => {
                    *record = found;
                    Ok(())
                }
                None => Err(DataError::not_found(format!(
                    "no `{}` row with `{}` = {}",
                    schema.table,
                    schema.primary_key,
                    record.pkey().to_text().unwrap_or_default()
                ))),
            }
        }
    }

    /// Replace `record` with the first row matching all its non-null fields.
    fn fill<R: Record>(
        &self,
        record: &mut R,
    ) -> impl Future<Output = Result<(), DataError>> + Send {
        async move {
            let schema = R::schema();
            let mut query = FetchQuery::new().limit(1).offset(0);
            for (field, value) in record.to_map() {
                if !value.is_null() {
                    query = query.filter(field, value);
                }
            }
            if query.params.is_empty() {
                return Err(DataError::invalid(format!(
                    "cannot fill `{}` from a record with no fields set",
                    schema.table
                )));
            }
            match self.fetch::<R>(query).await?.into_first() {
                Some(found) => {
                    *record = found;
                    Ok(())
                }
                None => Err(DataError::not_found(format!(
                    "no `{}` row matches the record's fields",
                    schema.table
                ))),
            }
        }
    }

    /// `update` when the primary key is set, `insert` otherwise; returns the
    /// record's primary-key value.
    fn save<R: Record>(
        &self,
        record: &mut R,
    ) -> impl Future<Output = Result<Value, DataError>> + Send {
        async move {
            if record.has_pkey() {
                self.update(record).await?;
                Ok(record.pkey().clone())
            } else {
                self.insert(record).await
            }
        }
    }
}

fn coerce_pkey<R: Record>(pkey: Value) -> Value {
    match (R::schema().primary_key_type(), pkey) {
        (FieldType::Integer, Value::List(items)) => Value::List(
            items
                .into_iter()
                .map(|item| FieldType::Integer.coerce(item))
                .collect(),
        ),
        (FieldType::Integer, pkey) => FieldType::Integer.coerce(pkey),
        (_, pkey) => pkey,
    }
}
