//! SQLite backend for the sales document store.
//!
//! Each order is kept whole as a JSON document; nested fields are addressed
//! with `json_extract`. Wraps [`tokio_rusqlite`] so all database access runs
//! on a dedicated thread without blocking the async runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
