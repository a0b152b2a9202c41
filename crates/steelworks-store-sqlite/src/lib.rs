//! SQLite backend for the SteelWorks operations store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Every report has one fixed SQL shape;
//! aggregation, ordering, and tie-breaks are pushed down to SQLite so result
//! correctness rests on the store's grouping semantics, not on application
//! loops.

mod encode;
mod schema;
mod store;

pub mod error;
pub mod seed;

pub use error::{Error, Result};
pub use store::SqliteStore;
