//! Error types for the sales CSV transformer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// Only raised under [`DateFallback::Reject`](crate::DateFallback::Reject).
  #[error("row {row}: unparseable date {value:?}")]
  UnparseableDate { row: usize, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
