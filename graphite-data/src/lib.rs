//! # graphite-data: record persistence for Graphite
//!
//! A typed record layer over a relational store. Records declare a static
//! [`Schema`]; a [`DataProvider`] fetches, inserts, updates and deletes
//! them one at a time, and builds the convenience operations (`by_pk`,
//! `provide`, `load`, `select`, `fill`, `save`) on top of those primitives.
//!
//! # What's in this crate
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Record`] / [`record!`] | A typed entity with dirty tracking and lifecycle hooks |
//! | [`Schema`] | Table, primary key, declared fields and their [`FieldType`]s |
//! | [`Value`] | Dynamically typed field value |
//! | [`DataProvider`] | Async CRUD contract plus the convenience operations |
//! | [`RelationalDataProvider`] | MySQL-dialect engine over a [`StoreConnection`] |
//! | [`FetchQuery`] | Field constraints, ordering, pagination |
//! | [`order_by_clause`] | Whitelisted ORDER BY rendering |
//! | [`ResultSet`] | Fetched records keyed by primary key |
//! | [`DataError`] | `InvalidRequest` / `NotFound` / `Store` |
//!
//! # Quick start
//!
//! ```ignore
//! use graphite_data::prelude::*;
//!
//! graphite_data::record! {
//!     pub struct User {
//!         table: "users",
//!         primary_key: "user_id",
//!         fields: { user_id: Integer, name: String, active: Boolean }
//!     }
//! }
//!
//! let provider = RelationalDataProvider::new(store);
//! let mut user = User::default();
//! user.set("name", "Ann");
//! user.set("active", true);
//! let id = provider.save(&mut user).await?;
//!
//! let same: User = provider.by_pk(id).await?;
//! let active = provider
//!     .fetch::<User>(FetchQuery::new().filter("active", true).order_by("name", true))
//!     .await?;
//! ```

pub mod error;
pub mod macros;
pub mod order;
pub mod provider;
pub mod query;
pub mod record;
pub mod relational;
pub mod result_set;
pub mod schema;
pub mod store;
pub mod value;

pub use error::{DataError, DataResult};
pub use order::{order_by_clause, OrderDirection, RANDOM_ORDER};
pub use provider::DataProvider;
pub use query::{
    build_delete, build_insert, build_select, build_update, build_upsert, render_literal,
    FetchQuery,
};
pub use record::{Record, RecordData};
pub use relational::RelationalDataProvider;
pub use result_set::ResultSet;
pub use schema::{FieldSpec, Schema, SchemaError};
pub use store::{escape_string, Execution, Row, StoreConnection};
pub use value::{FieldType, Value};

pub mod prelude {
    //! Re-exports of the most commonly used data types.
    pub use crate::{
        DataError, DataProvider, FetchQuery, OrderDirection, Record, RelationalDataProvider,
        ResultSet, Schema, StoreConnection, Value,
    };
}
