//! [`SqliteStore`], the SQLite implementation of [`AccessStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use ramp_core::{
  aggregate::Aggregate,
  building::Building,
  review::ReviewDocument,
  store::AccessStore,
};

use crate::{
  encode::{
    decode_aggregate, decode_building, encode_aggregate, encode_building, encode_dt,
    encode_uuid, RawReview,
  },
  schema::SCHEMA,
  Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Ramp document store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Append a review document filed under `gid`.
  ///
  /// The body is stored as given; its shape is only checked when folded.
  pub async fn insert_review(&self, gid: &str, body: Value) -> Result<ReviewDocument> {
    let review_id   = Uuid::new_v4();
    let recorded_at = Utc::now();

    let id_str   = encode_uuid(review_id);
    let gid      = gid.to_owned();
    let at_str   = encode_dt(recorded_at);
    let body_str = body.to_string();

    let seq = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO reviews (review_id, gid, recorded_at, body) VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, gid, at_str, body_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(ReviewDocument { review_id, seq, recorded_at, body })
  }

  /// Insert or overwrite a building record.
  pub async fn put_building(&self, building: &Building) -> Result<()> {
    let gid      = building.gid.clone();
    let body_str = encode_building(building)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO buildings (gid, body) VALUES (?1, ?2)
           ON CONFLICT (gid) DO UPDATE SET body = excluded.body",
          rusqlite::params![gid, body_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── AccessStore impl ────────────────────────────────────────────────────────

impl AccessStore for SqliteStore {
  type Error = crate::Error;

  // ── Reviews ───────────────────────────────────────────────────────────────

  async fn reviews_for_building(&self, gid: &str) -> Result<Vec<ReviewDocument>> {
    let gid_str = gid.to_owned();

    let raws: Vec<RawReview> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT seq, review_id, recorded_at, body FROM reviews WHERE gid = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![gid_str], |row| {
            Ok(RawReview {
              seq:         row.get(0)?,
              review_id:   row.get(1)?,
              recorded_at: row.get(2)?,
              body:        row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    // An unreadable row is one bad review, not a broken store.
    Ok(
      raws
        .into_iter()
        .filter_map(|raw| {
          let seq = raw.seq;
          match raw.into_document() {
            Ok(doc) => Some(doc),
            Err(e) => {
              warn!(gid, seq, error = %e, "skipping unreadable review row");
              None
            }
          }
        })
        .collect(),
    )
  }

  // ── Aggregates ────────────────────────────────────────────────────────────

  async fn get_aggregate(&self, gid: &str) -> Result<Option<Aggregate>> {
    let gid_str = gid.to_owned();

    let body: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT body FROM aggregations WHERE gid = ?1",
            rusqlite::params![gid_str],
            |row| row.get(0),
          )
          .optional()?)
      })
      .await?;

    body.as_deref().map(decode_aggregate).transpose()
  }

  async fn upsert_aggregate_if_absent(&self, initial: &Aggregate) -> Result<Aggregate> {
    let gid_str  = initial.gid.clone();
    let body_str = encode_aggregate(initial)?;

    // Insert and re-read on the connection thread, so no other call can
    // interleave between the two statements.
    let stored: String = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO aggregations (gid, body) VALUES (?1, ?2)
           ON CONFLICT (gid) DO NOTHING",
          rusqlite::params![gid_str, body_str],
        )?;
        Ok(conn.query_row(
          "SELECT body FROM aggregations WHERE gid = ?1",
          rusqlite::params![gid_str],
          |row| row.get(0),
        )?)
      })
      .await?;

    decode_aggregate(&stored)
  }

  async fn ensure_aggregate(&self, initial: &Aggregate) -> Result<()> {
    let gid_str  = initial.gid.clone();
    let body_str = encode_aggregate(initial)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO aggregations (gid, body) VALUES (?1, ?2)
           ON CONFLICT (gid) DO NOTHING",
          rusqlite::params![gid_str, body_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn replace_aggregate(&self, aggregate: &Aggregate) -> Result<()> {
    let gid_str  = aggregate.gid.clone();
    let body_str = encode_aggregate(aggregate)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO aggregations (gid, body) VALUES (?1, ?2)
           ON CONFLICT (gid) DO UPDATE SET body = excluded.body",
          rusqlite::params![gid_str, body_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn list_aggregates(&self) -> Result<Vec<Aggregate>> {
    let rows: Vec<(String, String)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT gid, body FROM aggregations ORDER BY gid")?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(
      rows
        .iter()
        .filter_map(|(gid, body)| match decode_aggregate(body) {
          Ok(aggregate) => Some(aggregate),
          Err(e) => {
            warn!(gid = %gid, error = %e, "skipping unreadable aggregate");
            None
          }
        })
        .collect(),
    )
  }

  // ── Buildings ─────────────────────────────────────────────────────────────

  async fn get_building(&self, gid: &str) -> Result<Option<Building>> {
    let gid_str = gid.to_owned();

    let body: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT body FROM buildings WHERE gid = ?1",
            rusqlite::params![gid_str],
            |row| row.get(0),
          )
          .optional()?)
      })
      .await?;

    body.as_deref().map(decode_building).transpose()
  }
}
