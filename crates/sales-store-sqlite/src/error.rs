//! Error type for `sales-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] sales_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// Index requested on something that is not a dotted identifier path.
  #[error("invalid field path: {0:?}")]
  InvalidFieldPath(String),

  #[error("unknown index direction {direction} on {name}")]
  InvalidDirection { name: String, direction: i32 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
