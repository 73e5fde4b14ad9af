//! Handlers for `/aggregations` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/aggregations` | Ordered by building identifier |
//! | `GET`  | `/aggregations/accessible` | `?categories=mobility,vision` |
//! | `GET`  | `/aggregations/:gid` | 404 if never computed |
//! | `POST` | `/aggregations/:gid/recompute` | Rebuilds from every review |
//! | `POST` | `/aggregations/:gid/debug-recompute` | Same, logging the raw document |
//! | `GET`  | `/aggregations/:gid/scores` | 404 if never computed |
//! | `GET`  | `/aggregations/:gid/summary` | 404 if never computed |

use std::collections::BTreeMap;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use ramp_core::{
  aggregate::Aggregate,
  building::Building,
  category::Category,
  filter::filter_accessible,
  score::CategoryScores,
  store::AccessStore,
};
use ramp_summary::{CategorySummary, TextGenerator};
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /aggregations`
pub async fn list<S, G>(
  State(state): State<ApiState<S, G>>,
) -> Result<Json<Vec<Aggregate>>, ApiError>
where
  S: AccessStore,
  G: TextGenerator,
{
  Ok(Json(state.engine.list().await?))
}

// ─── Accessible ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AccessibleParams {
  /// Comma-separated category names; absent or empty matches everything.
  #[serde(default)]
  pub categories: String,
}

/// One filter hit: the aggregate document plus its building, when known.
#[derive(Debug, Serialize)]
pub struct AccessibleBuilding {
  #[serde(flatten)]
  pub aggregate: Aggregate,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub building:  Option<Building>,
}

/// `GET /aggregations/accessible[?categories=<list>]`
pub async fn accessible<S, G>(
  State(state): State<ApiState<S, G>>,
  Query(params): Query<AccessibleParams>,
) -> Result<Json<Vec<AccessibleBuilding>>, ApiError>
where
  S: AccessStore,
  G: TextGenerator,
{
  let needs = Category::parse_list(&params.categories)?;
  let aggregates = state.engine.list().await?;

  let mut hits = Vec::new();
  for aggregate in filter_accessible(&aggregates, &needs) {
    let building = state.engine.building(&aggregate.gid).await?;
    hits.push(AccessibleBuilding { aggregate: aggregate.clone(), building });
  }
  Ok(Json(hits))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /aggregations/:gid`
pub async fn get_one<S, G>(
  State(state): State<ApiState<S, G>>,
  Path(gid): Path<String>,
) -> Result<Json<Aggregate>, ApiError>
where
  S: AccessStore,
  G: TextGenerator,
{
  Ok(Json(state.engine.fetch(&gid).await?))
}

// ─── Recompute ────────────────────────────────────────────────────────────────

/// `POST /aggregations/:gid/recompute`
pub async fn recompute<S, G>(
  State(state): State<ApiState<S, G>>,
  Path(gid): Path<String>,
) -> Result<Json<Aggregate>, ApiError>
where
  S: AccessStore,
  G: TextGenerator,
{
  Ok(Json(state.engine.recompute(&gid).await?))
}

/// `POST /aggregations/:gid/debug-recompute`
pub async fn debug_recompute<S, G>(
  State(state): State<ApiState<S, G>>,
  Path(gid): Path<String>,
) -> Result<Json<Aggregate>, ApiError>
where
  S: AccessStore,
  G: TextGenerator,
{
  Ok(Json(state.engine.debug_recompute(&gid).await?))
}

// ─── Derived views ────────────────────────────────────────────────────────────

/// `GET /aggregations/:gid/scores`
pub async fn scores<S, G>(
  State(state): State<ApiState<S, G>>,
  Path(gid): Path<String>,
) -> Result<Json<CategoryScores>, ApiError>
where
  S: AccessStore,
  G: TextGenerator,
{
  let aggregate = state.engine.fetch(&gid).await?;
  Ok(Json(CategoryScores::of(&aggregate)))
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
  #[serde(rename = "GID")]
  pub gid:        String,
  pub categories: BTreeMap<Category, CategorySummary>,
}

/// `GET /aggregations/:gid/summary`
pub async fn summary<S, G>(
  State(state): State<ApiState<S, G>>,
  Path(gid): Path<String>,
) -> Result<Json<SummaryResponse>, ApiError>
where
  S: AccessStore,
  G: TextGenerator,
{
  let aggregate = state.engine.fetch(&gid).await?;
  let categories = state.summarizer.describe(&aggregate).await;
  Ok(Json(SummaryResponse { gid: aggregate.gid, categories }))
}
