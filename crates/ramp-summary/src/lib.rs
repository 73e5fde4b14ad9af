//! Human-readable per-category summaries of an aggregate.
//!
//! Numbers are formatted locally; the comment synopsis is delegated to an
//! external text model through [`TextGenerator`]. A failing or slow model only
//! degrades the synopsis of the category it was asked about.

#![allow(async_fn_in_trait)]

pub mod error;
mod generator;
mod summarizer;

pub use error::{GenerationError, Result};
pub use generator::{
  DEFAULT_BASE_URL, DEFAULT_MODEL, OpenAiConfig, OpenAiGenerator, TextGenerator,
};
pub use summarizer::{
  Availability, CategorySummary, FeatureStatus, NO_COMMENTS, NO_RATINGS, Summarizer,
  UNAVAILABLE,
};
