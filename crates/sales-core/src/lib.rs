//! Core types and trait definitions for the sales document store.
//!
//! This crate is free of database and file-format dependencies. The CSV
//! transformer, the SQLite backend and the CLI all depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod date;
pub mod error;
pub mod gateway;
pub mod index;
pub mod order;
pub mod report;
pub mod store;
pub mod timestamp;

pub use error::{Error, Result};
pub use gateway::SalesGateway;
