//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, UUIDs hyphenated lowercase strings, and
//! documents compact JSON.

use chrono::{DateTime, Utc};
use ramp_core::{aggregate::Aggregate, building::Building, review::ReviewDocument};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Documents ───────────────────────────────────────────────────────────────

pub fn encode_aggregate(aggregate: &Aggregate) -> Result<String> {
  Ok(aggregate.to_document()?.to_string())
}

/// Any failure is [`ramp_core::Error::InvalidAggregate`], never a storage
/// error.
pub fn decode_aggregate(body: &str) -> Result<Aggregate> {
  let doc = serde_json::from_str(body)
    .map_err(|e| ramp_core::Error::InvalidAggregate(e.to_string()))?;
  Ok(Aggregate::from_document(doc)?)
}

pub fn encode_building(building: &Building) -> Result<String> {
  Ok(serde_json::to_string(building)?)
}

pub fn decode_building(body: &str) -> Result<Building> {
  Ok(serde_json::from_str(body)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `reviews` row.
pub struct RawReview {
  pub seq:         i64,
  pub review_id:   String,
  pub recorded_at: String,
  pub body:        String,
}

impl RawReview {
  pub fn into_document(self) -> Result<ReviewDocument> {
    Ok(ReviewDocument {
      review_id:   decode_uuid(&self.review_id)?,
      seq:         self.seq,
      recorded_at: decode_dt(&self.recorded_at)?,
      body:        serde_json::from_str(&self.body)?,
    })
  }
}
