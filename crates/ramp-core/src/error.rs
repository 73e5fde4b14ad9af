//! Error types for `ramp-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// The backing store could not be reached or failed mid-operation.
  #[error("storage unavailable: {0}")]
  StorageUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("aggregate not found for building {0:?}")]
  AggregateNotFound(String),

  /// A stored review does not match the expected document shape.
  #[error("invalid review {review_id}: {reason}")]
  InvalidReview { review_id: Uuid, reason: String },

  /// A stored aggregate document does not match the expected shape.
  #[error("invalid aggregate document: {0}")]
  InvalidAggregate(String),

  #[error("unknown category: {0:?}")]
  UnknownCategory(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  /// Wrap a backend error as [`Error::StorageUnavailable`].
  pub fn storage<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::StorageUnavailable(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
