//! Error type for `ramp-summary`.

use std::time::Duration;

use thiserror::Error;

/// Why a text-generation call produced no usable text.
#[derive(Debug, Error)]
pub enum GenerationError {
  #[error("text generation is not configured")]
  Disabled,

  #[error("request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("model endpoint returned HTTP {status}: {body}")]
  Status { status: u16, body: String },

  #[error("model returned no text")]
  EmptyResponse,

  #[error("no response within {0:?}")]
  Timeout(Duration),
}

pub type Result<T, E = GenerationError> = std::result::Result<T, E>;
