//! Test utilities for Graphite.
//!
//! [`FakeStore`] is an in-memory [`StoreConnection`] that records every
//! statement it receives and answers from scripted responses, so provider
//! behavior can be asserted on the exact SQL without a database.
//!
//! ```ignore
//! use graphite_test::{row, FakeStore};
//!
//! let store = FakeStore::new();
//! store.push_rows(vec![row! { "user_id" => 5, "name" => "Ann" }]);
//! let provider = RelationalDataProvider::new(store.clone());
//!
//! let user: User = provider.by_pk(5).await?;
//! assert!(store.last_statement().unwrap().contains("t.`user_id` = '5'"));
//! ```

mod store;

pub use store::FakeStore;

/// Build a [`Row`](graphite_data::Row) from `column => value` pairs.
///
/// Values go through `Value::from`, so literals of any supported type work.
#[macro_export]
macro_rules! row {
    () => {
        $crate::__private::Row::new()
    };
    ( $( $column:expr => $value:expr ),+ $(,)? ) => {{
        let mut row = $crate::__private::Row::new();
        $( row.insert(::std::string::String::from($column), $crate::__private::Value::from($value)); )+
        row
    }};
}

#[doc(hidden)]
pub mod __private {
    pub use graphite_data::{Row, Value};
}
