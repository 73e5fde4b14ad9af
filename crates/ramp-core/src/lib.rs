//! Core types and the aggregation engine for the Ramp accessibility-rating
//! platform.
//!
//! No HTTP or database dependencies live here. All other crates depend on
//! it; storage backends implement [`store::AccessStore`].

// Trait methods spell out their `Send` futures; impls use plain `async fn`.
#![allow(async_fn_in_trait)]

pub mod aggregate;
pub mod building;
pub mod category;
pub mod engine;
pub mod error;
pub mod filter;
pub mod fold;
pub mod review;
pub mod score;
pub mod store;

pub use error::{Error, Result};
