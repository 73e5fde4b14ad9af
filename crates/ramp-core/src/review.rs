//! Reviews: immutable, user-submitted assessments of one building.
//!
//! Reviews live in the document store in the flat layout used by the
//! submission forms: one `{prefix}_dict`, `{prefix}_rating` and
//! `{prefix}_text` field per [`Category`]. The store hands them over as raw
//! [`ReviewDocument`]s; [`Review::from_document`] validates the shape.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::EnumCount as _;
use uuid::Uuid;

use crate::{Error, Result, category::Category};

/// Highest rating on the review scale. `0` means "not rated".
pub const MAX_RATING: u8 = 5;

// ─── Raw document ────────────────────────────────────────────────────────────

/// A review exactly as stored, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewDocument {
  pub review_id:   Uuid,
  /// Store-assigned insertion sequence; defines the scan order of a fold.
  pub seq:         i64,
  pub recorded_at: DateTime<Utc>,
  pub body:        Value,
}

// ─── Validated review ────────────────────────────────────────────────────────

/// One category's portion of a review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryReview {
  /// Sub-feature name to its raw tri-state text (`"true"`, `"false"`, or
  /// anything else, which counts as unanswered).
  pub features: BTreeMap<String, String>,
  /// `0` when the reviewer did not rate this category.
  pub rating:   u8,
  pub text:     Option<String>,
}

impl CategoryReview {
  /// The comment with surrounding whitespace removed, if anything remains.
  pub fn comment(&self) -> Option<&str> {
    self.text.as_deref().map(str::trim).filter(|t| !t.is_empty())
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
  pub review_id:     Uuid,
  pub seq:           i64,
  pub recorded_at:   DateTime<Utc>,
  pub gid:           String,
  pub user_name:     Option<String>,
  pub building_name: Option<String>,
  pub categories:    [CategoryReview; Category::COUNT],
}

impl Review {
  pub fn category(&self, category: Category) -> &CategoryReview {
    &self.categories[category.index()]
  }

  /// Validate a stored document.
  ///
  /// Fails with [`Error::InvalidReview`] when the document is not an object,
  /// lacks a string `GID`, or has a field of the wrong type. A rating outside
  /// `0..=5` is a shape violation. Individual sub-feature values that are not
  /// strings are dropped rather than rejected.
  pub fn from_document(doc: ReviewDocument) -> Result<Self> {
    let review_id = doc.review_id;
    let invalid = |reason: String| Error::InvalidReview { review_id, reason };

    let Value::Object(obj) = doc.body else {
      return Err(invalid("document is not an object".into()));
    };

    let gid = optional_str(&obj, "GID")
      .map_err(invalid)?
      .ok_or_else(|| invalid("missing GID".into()))?;
    let user_name = optional_str(&obj, "user_name").map_err(invalid)?;
    let building_name = optional_str(&obj, "buildingName").map_err(invalid)?;

    let mut categories: [CategoryReview; Category::COUNT] = Default::default();
    for category in Category::all() {
      categories[category.index()] = CategoryReview {
        features: features(&obj, &category.dict_field()).map_err(invalid)?,
        rating:   rating(&obj, &category.rating_field()).map_err(invalid)?,
        text:     optional_str(&obj, &category.text_field()).map_err(invalid)?,
      };
    }

    Ok(Self {
      review_id,
      seq: doc.seq,
      recorded_at: doc.recorded_at,
      gid,
      user_name,
      building_name,
      categories,
    })
  }
}

/// Interpret a tri-state sub-feature value. Only `"true"` and `"false"`
/// (any ASCII case) are answers.
pub fn parse_flag(raw: &str) -> Option<bool> {
  if raw.eq_ignore_ascii_case("true") {
    Some(true)
  } else if raw.eq_ignore_ascii_case("false") {
    Some(false)
  } else {
    None
  }
}

// ─── Field readers ───────────────────────────────────────────────────────────

fn optional_str(
  obj: &Map<String, Value>,
  key: &str,
) -> std::result::Result<Option<String>, String> {
  match obj.get(key) {
    None | Some(Value::Null) => Ok(None),
    Some(Value::String(s)) => Ok(Some(s.clone())),
    Some(other) => Err(format!("{key} must be a string, got {}", kind(other))),
  }
}

fn features(
  obj: &Map<String, Value>,
  key: &str,
) -> std::result::Result<BTreeMap<String, String>, String> {
  match obj.get(key) {
    None | Some(Value::Null) => Ok(BTreeMap::new()),
    Some(Value::Object(map)) => Ok(
      map
        .iter()
        .filter_map(|(name, v)| v.as_str().map(|s| (name.clone(), s.to_owned())))
        .collect(),
    ),
    Some(other) => Err(format!("{key} must be an object, got {}", kind(other))),
  }
}

fn rating(obj: &Map<String, Value>, key: &str) -> std::result::Result<u8, String> {
  match obj.get(key) {
    None | Some(Value::Null) => Ok(0),
    Some(Value::Number(n)) => n
      .as_u64()
      .filter(|r| *r <= u64::from(MAX_RATING))
      .map(|r| r as u8)
      .ok_or_else(|| format!("{key} must be an integer in 0..={MAX_RATING}, got {n}")),
    Some(other) => Err(format!("{key} must be an integer, got {}", kind(other))),
  }
}

fn kind(v: &Value) -> &'static str {
  match v {
    Value::Null => "null",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}
