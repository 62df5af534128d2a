//! Error types for `sales-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unparseable date: {0:?}")]
  InvalidDate(String),

  #[error("batch size must be at least 1")]
  InvalidBatchSize,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  /// Wrap a backend error. Used by the gateway, which is generic over the
  /// store's associated error type.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
