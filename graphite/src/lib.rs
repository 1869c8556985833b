//! Graphite: typed record persistence over a relational store.
//!
//! This facade crate re-exports the Graphite sub-crates through a single
//! dependency with feature flags:
//!
//! ```ignore
//! use graphite::prelude::*;
//! ```
//!
//! # Feature flags
//!
//! | Feature | Default | Crate |
//! |---------|---------|-------|
//! | `data`  | **yes** | `graphite-data` (records, query builder, providers) |
//! | `mysql` | no      | `graphite-data-sqlx` (MySQL store over sqlx) |
//! | `test`  | no      | `graphite-test` (`FakeStore`, `row!`) |
//! | `full`  | no      | All of the above |

pub use graphite_core;
pub use graphite_core::*;

#[cfg(feature = "data")]
pub use graphite_data;

#[cfg(feature = "data")]
pub use graphite_data::record;

#[cfg(feature = "mysql")]
pub use graphite_data_sqlx;

#[cfg(feature = "test")]
pub use graphite_test;

/// Unified prelude: configuration and tracing entry points plus the types
/// of every enabled feature crate.
pub mod prelude {
    pub use graphite_core::{init_tracing, ConfigProperties, GraphiteConfig};

    #[cfg(feature = "data")]
    pub use graphite_data::prelude::*;

    #[cfg(feature = "mysql")]
    pub use graphite_data_sqlx::prelude::*;
}
