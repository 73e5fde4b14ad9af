//! Error type for `ramp-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] ramp_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Decode failures keep their core variant; everything else is the store
/// being unavailable.
impl From<Error> for ramp_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(core) => core,
      other => ramp_core::Error::storage(other),
    }
  }
}
