//! JSON REST API for Ramp.
//!
//! Exposes an axum [`Router`] backed by any [`ramp_core::store::AccessStore`]
//! and any [`ramp_summary::TextGenerator`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", ramp_api::api_router(state))
//! ```

pub mod aggregations;
pub mod error;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use ramp_core::{engine::AggregationEngine, store::AccessStore};
use ramp_summary::{Summarizer, TextGenerator};

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<S, G> {
  pub engine:     Arc<AggregationEngine<S>>,
  pub summarizer: Arc<Summarizer<G>>,
}

impl<S, G> ApiState<S, G> {
  pub fn new(engine: AggregationEngine<S>, summarizer: Summarizer<G>) -> Self {
    Self { engine: Arc::new(engine), summarizer: Arc::new(summarizer) }
  }
}

// Derived `Clone` would demand `S: Clone + G: Clone`.
impl<S, G> Clone for ApiState<S, G> {
  fn clone(&self) -> Self {
    Self {
      engine:     Arc::clone(&self.engine),
      summarizer: Arc::clone(&self.summarizer),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, G>(state: ApiState<S, G>) -> Router<()>
where
  S: AccessStore + 'static,
  G: TextGenerator + 'static,
{
  Router::new()
    .route("/aggregations", get(aggregations::list::<S, G>))
    .route("/aggregations/accessible", get(aggregations::accessible::<S, G>))
    .route("/aggregations/{gid}", get(aggregations::get_one::<S, G>))
    .route("/aggregations/{gid}/recompute", post(aggregations::recompute::<S, G>))
    .route(
      "/aggregations/{gid}/debug-recompute",
      post(aggregations::debug_recompute::<S, G>),
    )
    .route("/aggregations/{gid}/scores", get(aggregations::scores::<S, G>))
    .route("/aggregations/{gid}/summary", get(aggregations::summary::<S, G>))
    .with_state(state)
}
