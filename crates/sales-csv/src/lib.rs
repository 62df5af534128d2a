//! CSV codec for the sales document store.
//!
//! Reads a sales report export and builds one [`OrderDocument`] per row.
//! Public API:
//!
//! - [`Transformer::transform_path`] / [`Transformer::transform_reader`] —
//!   whole file → [`Transformed`]
//! - [`Transformer::transform_row`] — single [`Row`] → document
//!
//! [`OrderDocument`]: sales_core::order::OrderDocument

pub mod columns;
pub mod error;
pub mod transform;

pub use error::{Error, Result};
pub use transform::{DateFallback, Row, Transformed, Transformer};
