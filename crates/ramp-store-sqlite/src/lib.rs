//! SQLite backend for the Ramp document store.
//!
//! Each collection (reviews, buildings, aggregations) is a table of JSON
//! documents keyed by building identifier. Wraps [`tokio_rusqlite`] so all
//! database access runs on a dedicated thread without blocking the async
//! runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
