use std::collections::HashMap;

use crate::schema::Schema;
use crate::store::Row;
use crate::value::Value;

static NULL: Value = Value::Null;

/// Field storage shared by every record type.
///
/// Holds the current values and the values as last loaded from or
/// persisted to the store. A field is dirty when the two differ, so
/// assigning the persisted value back is not a change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordData {
    values: HashMap<&'static str, Value>,
    persisted: HashMap<&'static str, Value>,
}

impl RecordData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> &Value {
        self.values.get(field).unwrap_or(&NULL)
    }

    /// Assign a current value without touching the persisted state.
    pub fn put(&mut self, field: &'static str, value: Value) {
        self.values.insert(field, value);
    }

    /// Assign a value as loaded from the store (not dirty).
    pub fn load(&mut self, field: &'static str, value: Value) {
        self.persisted.insert(field, value.clone());
        self.values.insert(field, value);
    }

    pub fn is_dirty(&self, field: &str) -> bool {
        self.get(field) != self.persisted.get(field).unwrap_or(&NULL)
    }

    /// Dirty fields with their current values, in schema order.
    pub fn diff(&self, schema: &Schema) -> Vec<(&'static str, Value)> {
        schema
            .fields
            .iter()
            .filter(|spec| self.is_dirty(spec.name))
            .map(|spec| (spec.name, self.get(spec.name).clone()))
            .collect()
    }

    /// Mark the current values as persisted.
    pub fn commit(&mut self) {
        self.persisted = self.values.clone();
    }
}

/// A typed entity mapped to one row of one table.
///
/// Implemented by hand or generated with [`record!`](crate::record).
/// Implementors only provide the schema and the storage accessors; the
/// lifecycle hooks default to no-ops.
///
/// # Example
///
/// ```ignore
/// impl Record for Article {
///     fn schema() -> &'static Schema { &ARTICLES }
///     fn data(&self) -> &RecordData { &self.data }
///     fn data_mut(&mut self) -> &mut RecordData { &mut self.data }
///
///     fn before_insert(&mut self) {
///         self.set("created_at", "2024-01-01 00:00:00");
///     }
/// }
/// ```
pub trait Record: Default + Clone + Send + Sync + 'static {
    fn schema() -> &'static Schema;
    fn data(&self) -> &RecordData;
    fn data_mut(&mut self) -> &mut RecordData;

    /// Runs before the INSERT statement is built.
    fn before_insert(&mut self) {}

    /// Runs before the UPDATE statement is built.
    fn before_update(&mut self) {}

    /// Runs before the DELETE statement is issued.
    fn before_delete(&mut self) {}

    /// A new record with only its primary key set.
    fn with_pkey(pkey: impl Into<Value>) -> Self {
        let mut record = Self::default();
        record.set(Self::schema().primary_key, pkey);
        record
    }

    /// Build a record from a store row; the result has no dirty fields.
    ///
    /// Columns that are not declared fields are ignored.
    fn hydrate(row: &Row) -> Self {
        let mut record = Self::default();
        for spec in Self::schema().fields {
            if let Some(value) = row.get(spec.name) {
                let value = spec.field_type.coerce(value.clone());
                record.data_mut().load(spec.name, value);
            }
        }
        record
    }

    fn get(&self, field: &str) -> &Value {
        self.data().get(field)
    }

    /// Assign a field, coercing the value through the field's type.
    ///
    /// Returns `false` (and changes nothing) if `field` is not declared.
    fn set(&mut self, field: &str, value: impl Into<Value>) -> bool {
        match Self::schema().field(field) {
            Some(spec) => {
                let value = spec.field_type.coerce(value.into());
                self.data_mut().put(spec.name, value);
                true
            }
            None => false,
        }
    }

    fn pkey(&self) -> &Value {
        self.get(Self::schema().primary_key)
    }

    fn has_pkey(&self) -> bool {
        !self.pkey().is_null()
    }

    /// Every declared field with its current value (`Null` when unset).
    fn to_map(&self) -> Vec<(&'static str, Value)> {
        Self::schema()
            .fields
            .iter()
            .map(|spec| (spec.name, self.get(spec.name).clone()))
            .collect()
    }

    fn diff(&self) -> Vec<(&'static str, Value)> {
        self.data().diff(Self::schema())
    }

    fn is_dirty(&self) -> bool {
        Self::schema()
            .fields
            .iter()
            .any(|spec| self.data().is_dirty(spec.name))
    }

    /// Clear dirty tracking after a successful persist.
    fn commit_diff(&mut self) {
        self.data_mut().commit();
    }
}
