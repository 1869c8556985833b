use std::collections::HashMap;
use std::future::Future;

use crate::error::DataError;
use crate::value::Value;

/// One row returned by the store, keyed by column name.
pub type Row = HashMap<String, Value>;

/// Outcome of a statement that returns no rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Execution {
    pub rows_affected: u64,
    /// Identity generated by the statement, `0` if none.
    pub last_insert_id: u64,
}

/// Connection to the relational store.
///
/// Executes raw statement text; acquiring and releasing the underlying
/// connection is up to the implementation. The generated identity is
/// returned with the statement's [`Execution`] so that pooled
/// implementations never report another statement's identity.
///
/// Uses RPITIT (return-position `impl Trait` in traits); no `async-trait` needed.
pub trait StoreConnection: Send + Sync {
    /// Run a statement that returns rows.
    fn query(&self, sql: &str) -> impl Future<Output = Result<Vec<Row>, DataError>> + Send;

    /// Run a statement that returns no rows.
    fn execute(&self, sql: &str) -> impl Future<Output = Result<Execution, DataError>> + Send;

    /// Escape `raw` for use inside a single-quoted SQL literal.
    fn escape(&self, raw: &str) -> String {
        escape_string(raw)
    }
}

/// MySQL string escaping, as done by `mysql_real_escape_string` for the
/// default character sets.
pub fn escape_string(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len() + raw.len() / 8);
    for c in raw.chars() {
        match c {
            '\0' => escaped.push_str("\\0"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '"' => escaped.push_str("\\\""),
            '\x1a' => escaped.push_str("\\Z"),
            c => escaped.push(c),
        }
    }
    escaped
}
