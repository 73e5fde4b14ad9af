//! Router tests against an in-memory SQLite store.

use std::time::Duration;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode},
};
use ramp_core::{building::Building, engine::AggregationEngine};
use ramp_store_sqlite::SqliteStore;
use ramp_summary::{GenerationError, NO_COMMENTS, Summarizer, TextGenerator, UNAVAILABLE};
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{ApiState, api_router};

/// Answers with the number of comment lines it was given.
struct Counting;

impl TextGenerator for Counting {
  async fn complete(&self, _system: &str, user: &str) -> ramp_summary::Result<String> {
    Ok(format!("{} comments.", user.lines().count() - 1))
  }
}

struct Broken;

impl TextGenerator for Broken {
  async fn complete(&self, _system: &str, _user: &str) -> ramp_summary::Result<String> {
    Err(GenerationError::EmptyResponse)
  }
}

async fn setup<G: TextGenerator + 'static>(generator: G) -> (SqliteStore, Router) {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let state = ApiState::new(
    AggregationEngine::new(store.clone()),
    Summarizer::new(generator, Duration::from_secs(1)),
  );
  (store, api_router(state))
}

async fn call(router: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
  let req = Request::builder()
    .method(method)
    .uri(uri)
    .body(Body::empty())
    .unwrap();
  let resp = router.clone().oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let body = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, body)
}

async fn seed_b1(store: &SqliteStore) {
  store
    .insert_review("B1", json!({
      "GID": "B1",
      "mobility_accessibility_dict": { "ramp": "true" },
      "mobility_accessibility_rating": 4,
      "mobility_accessibility_text": "Ramp at the side entrance.",
    }))
    .await
    .unwrap();
  store
    .insert_review("B1", json!({
      "GID": "B1",
      "mobility_accessibility_dict": { "ramp": "false" },
      "mobility_accessibility_rating": 0,
      "mobility_accessibility_text": "Ramp was blocked.",
    }))
    .await
    .unwrap();
}

// ── Get / recompute ──────────────────────────────────────────────────────────

#[tokio::test]
async fn get_unknown_aggregate_is_404() {
  let (_, router) = setup(Counting).await;
  let (status, body) = call(&router, "GET", "/aggregations/nowhere").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].as_str().unwrap().contains("nowhere"));
}

#[tokio::test]
async fn recompute_returns_and_stores_document() {
  let (store, router) = setup(Counting).await;
  seed_b1(&store).await;

  let (status, body) = call(&router, "POST", "/aggregations/B1/recompute").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["GID"], "B1");
  assert_eq!(body["mobility_accessibility_dict"]["ramp"], json!([1, 2]));
  assert_eq!(body["mobility_accessibility_rating"], json!([4, 1]));
  assert_eq!(
    body["mobility_accessibility_texts"],
    json!(["Ramp at the side entrance.", "Ramp was blocked."])
  );

  let (status, stored) = call(&router, "GET", "/aggregations/B1").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(stored, body);
}

#[tokio::test]
async fn debug_recompute_matches_recompute() {
  let (store, router) = setup(Counting).await;
  seed_b1(&store).await;

  let (_, plain) = call(&router, "POST", "/aggregations/B1/recompute").await;
  let (status, debug) = call(&router, "POST", "/aggregations/B1/debug-recompute").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(plain, debug);
}

#[tokio::test]
async fn recompute_without_reviews_is_zeroed() {
  let (_, router) = setup(Counting).await;
  let (status, body) = call(&router, "POST", "/aggregations/empty/recompute").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["mobility_accessibility_rating"], json!([0, 0]));
  assert_eq!(body["mobility_accessibility_dict"]["slopedramps"], json!([0, 0]));
}

#[tokio::test]
async fn list_returns_every_aggregate() {
  let (_, router) = setup(Counting).await;
  for gid in ["B2", "B1"] {
    call(&router, "POST", &format!("/aggregations/{gid}/recompute")).await;
  }
  let (status, body) = call(&router, "GET", "/aggregations").await;
  assert_eq!(status, StatusCode::OK);
  let gids: Vec<&str> = body
    .as_array()
    .unwrap()
    .iter()
    .map(|a| a["GID"].as_str().unwrap())
    .collect();
  assert_eq!(gids, vec!["B1", "B2"]);
}

// ── Scores / filter ──────────────────────────────────────────────────────────

#[tokio::test]
async fn scores_report_accessibility() {
  let (store, router) = setup(Counting).await;
  seed_b1(&store).await;
  call(&router, "POST", "/aggregations/B1/recompute").await;

  let (status, body) = call(&router, "GET", "/aggregations/B1/scores").await;
  assert_eq!(status, StatusCode::OK);
  let mobility = &body["scores"]["mobility_accessibility"];
  assert_eq!(mobility["score"], json!(80.0));
  assert_eq!(mobility["accessible"], json!(true));
  assert_eq!(body["scores"]["vision_accessibility"]["accessible"], json!(false));
}

#[tokio::test]
async fn accessible_filters_and_attaches_building() {
  let (store, router) = setup(Counting).await;
  seed_b1(&store).await;
  store
    .insert_review("B2", json!({ "GID": "B2", "mobility_accessibility_rating": 1 }))
    .await
    .unwrap();
  store
    .put_building(&Building {
      gid:           "B1".into(),
      building_name: "Central Library".into(),
      category:      None,
      address:       None,
      latitude:      None,
      longitude:     None,
    })
    .await
    .unwrap();
  for gid in ["B1", "B2"] {
    call(&router, "POST", &format!("/aggregations/{gid}/recompute")).await;
  }

  let (status, body) =
    call(&router, "GET", "/aggregations/accessible?categories=mobility").await;
  assert_eq!(status, StatusCode::OK);
  let hits = body.as_array().unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0]["GID"], "B1");
  assert_eq!(hits[0]["building"]["buildingName"], "Central Library");

  let (_, all) = call(&router, "GET", "/aggregations/accessible").await;
  assert_eq!(all.as_array().unwrap().len(), 2);
  assert!(all[1].get("building").is_none());
}

#[tokio::test]
async fn accessible_with_unknown_category_is_400() {
  let (_, router) = setup(Counting).await;
  let (status, body) =
    call(&router, "GET", "/aggregations/accessible?categories=mobility,elevators").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("elevators"));
}

// ── Summary ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn summary_describes_every_category() {
  let (store, router) = setup(Counting).await;
  seed_b1(&store).await;
  call(&router, "POST", "/aggregations/B1/recompute").await;

  let (status, body) = call(&router, "GET", "/aggregations/B1/summary").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["GID"], "B1");

  let mobility = &body["categories"]["mobility_accessibility"];
  assert_eq!(mobility["rating"], "4.0 out of 5");
  assert_eq!(mobility["synopsis"], "2 comments.");
  assert_eq!(mobility["features"][0]["name"], "ramp");
  assert_eq!(mobility["features"][0]["status"], "Available");

  assert_eq!(body["categories"]["vision_accessibility"]["synopsis"], NO_COMMENTS);
}

#[tokio::test]
async fn summary_survives_generator_failure() {
  let (store, router) = setup(Broken).await;
  seed_b1(&store).await;
  call(&router, "POST", "/aggregations/B1/recompute").await;

  let (status, body) = call(&router, "GET", "/aggregations/B1/summary").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["categories"]["mobility_accessibility"]["synopsis"], UNAVAILABLE);
}

#[tokio::test]
async fn summary_of_unknown_aggregate_is_404() {
  let (_, router) = setup(Counting).await;
  let (status, _) = call(&router, "GET", "/aggregations/B9/summary").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}
