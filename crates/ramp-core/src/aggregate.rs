//! The per-building aggregate: running statistics over every review of one
//! building, one [`CategoryAggregate`] per [`Category`].
//!
//! Persisted and served in a flat layout: for each category a
//! `{prefix}_dict` of `[yes, total]` pairs, a `{prefix}_rating` of
//! `[sum, count]`, and a `{prefix}_texts` list.

use std::collections::BTreeMap;

use serde::{
  Deserialize, Deserializer, Serialize, Serializer,
  de::Error as _,
  ser::SerializeMap as _,
};
use serde_json::{Map, Value};
use strum::EnumCount as _;

use crate::{Error, Result, category::Category};

// ─── Pairs ───────────────────────────────────────────────────────────────────

/// Answers recorded for one sub-feature. Invariant: `yes <= total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
  pub yes:   u64,
  pub total: u64,
}

impl Tally {
  pub fn record(&mut self, answer: bool) {
    self.total += 1;
    if answer {
      self.yes += 1;
    }
  }

  /// Share of "true" answers, `None` when never answered.
  pub fn ratio(&self) -> Option<f64> {
    (self.total > 0).then(|| self.yes as f64 / self.total as f64)
  }
}

impl Serialize for Tally {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    (self.yes, self.total).serialize(serializer)
  }
}

impl<'de> Deserialize<'de> for Tally {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let (yes, total) = <(u64, u64)>::deserialize(deserializer)?;
    if yes > total {
      return Err(D::Error::custom(format!(
        "tally [{yes}, {total}] has more yes answers than answers"
      )));
    }
    Ok(Self { yes, total })
  }
}

/// Sum and count of the non-zero ratings given to a category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingTally {
  pub sum:   u64,
  pub count: u64,
}

impl RatingTally {
  pub fn record(&mut self, rating: u8) {
    self.sum += u64::from(rating);
    self.count += 1;
  }

  pub fn mean(&self) -> Option<f64> {
    (self.count > 0).then(|| self.sum as f64 / self.count as f64)
  }
}

impl Serialize for RatingTally {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    (self.sum, self.count).serialize(serializer)
  }
}

impl<'de> Deserialize<'de> for RatingTally {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let (sum, count) = <(u64, u64)>::deserialize(deserializer)?;
    Ok(Self { sum, count })
  }
}

// ─── Category aggregate ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryAggregate {
  pub features: BTreeMap<String, Tally>,
  pub rating:   RatingTally,
  /// Trimmed, non-empty comments in scan order.
  pub texts:    Vec<String>,
}

/// Sub-features every fresh aggregate lists for `category`, even before any
/// review mentions them.
pub fn known_features(category: Category) -> &'static [&'static str] {
  match category {
    Category::Mobility => &[
      "slopedramps",
      "powerassisteddoors",
      "accessiblerestrooms",
      "accessibleseatingareas",
    ],
    _ => &[],
  }
}

// ─── Aggregate ───────────────────────────────────────────────────────────────

/// Exactly one exists per building identifier. Always rewritten whole.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
  pub gid:        String,
  pub categories: [CategoryAggregate; Category::COUNT],
}

impl Aggregate {
  /// The all-zero aggregate for a building with no folded reviews.
  pub fn zeroed(gid: impl Into<String>) -> Self {
    let mut categories: [CategoryAggregate; Category::COUNT] = Default::default();
    for category in Category::all() {
      categories[category.index()].features = known_features(category)
        .iter()
        .map(|name| ((*name).to_owned(), Tally::default()))
        .collect();
    }
    Self { gid: gid.into(), categories }
  }

  pub fn category(&self, category: Category) -> &CategoryAggregate {
    &self.categories[category.index()]
  }

  pub fn category_mut(&mut self, category: Category) -> &mut CategoryAggregate {
    &mut self.categories[category.index()]
  }

  /// Encode as a stored JSON document.
  pub fn to_document(&self) -> Result<Value> { Ok(serde_json::to_value(self)?) }

  /// Decode a stored JSON document.
  pub fn from_document(doc: Value) -> Result<Self> {
    match doc {
      Value::Object(map) => Self::from_map(map),
      _ => Err(Error::InvalidAggregate("document is not an object".into())),
    }
  }

  fn from_map(mut map: Map<String, Value>) -> Result<Self> {
    let gid = match map.remove("GID") {
      Some(Value::String(s)) => s,
      _ => return Err(Error::InvalidAggregate("missing string GID".into())),
    };

    let mut categories: [CategoryAggregate; Category::COUNT] = Default::default();
    for category in Category::all() {
      let slot = &mut categories[category.index()];
      let dict_key = category.dict_field();
      if let Some(v) = map.remove(&dict_key) {
        slot.features = field(v, &dict_key)?;
      }
      let rating_key = category.rating_field();
      if let Some(v) = map.remove(&rating_key) {
        slot.rating = field(v, &rating_key)?;
      }
      let texts_key = category.texts_field();
      if let Some(v) = map.remove(&texts_key) {
        slot.texts = field(v, &texts_key)?;
      }
    }

    Ok(Self { gid, categories })
  }
}

fn field<T: serde::de::DeserializeOwned>(v: Value, key: &str) -> Result<T> {
  serde_json::from_value(v).map_err(|e| Error::InvalidAggregate(format!("{key}: {e}")))
}

impl Serialize for Aggregate {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(1 + 3 * Category::COUNT))?;
    map.serialize_entry("GID", &self.gid)?;
    for category in Category::all() {
      let agg = self.category(category);
      map.serialize_entry(&category.dict_field(), &agg.features)?;
      map.serialize_entry(&category.rating_field(), &agg.rating)?;
      map.serialize_entry(&category.texts_field(), &agg.texts)?;
    }
    map.end()
  }
}

impl<'de> Deserialize<'de> for Aggregate {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let map = Map::<String, Value>::deserialize(deserializer)?;
    Self::from_map(map).map_err(D::Error::custom)
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn zeroed_aggregate_is_all_zero() {
    let agg = Aggregate::zeroed("B1");
    assert_eq!(agg.gid, "B1");
    for category in Category::all() {
      let c = agg.category(category);
      assert!(c.features.values().all(|t| *t == Tally::default()));
      assert_eq!(c.rating, RatingTally::default());
      assert!(c.texts.is_empty());
    }
    assert_eq!(agg.category(Category::Mobility).features.len(), 4);
  }

  #[test]
  fn pairs_serialize_as_two_element_arrays() {
    let mut agg = Aggregate::zeroed("B1");
    agg
      .category_mut(Category::Mobility)
      .features
      .insert("ramp".into(), Tally { yes: 1, total: 2 });
    agg.category_mut(Category::Mobility).rating = RatingTally { sum: 4, count: 1 };

    let doc = agg.to_document().unwrap();
    assert_eq!(doc["GID"], json!("B1"));
    assert_eq!(doc["mobility_accessibility_dict"]["ramp"], json!([1, 2]));
    assert_eq!(doc["mobility_accessibility_rating"], json!([4, 1]));
    assert_eq!(doc["overall_inclusivity_texts"], json!([]));

    let back = Aggregate::from_document(doc).unwrap();
    assert_eq!(back, agg);
  }

  #[test]
  fn missing_category_fields_decode_as_zero() {
    let agg = Aggregate::from_document(json!({
      "GID": "B2",
      "vision_accessibility_rating": [9, 2],
    }))
    .unwrap();
    assert_eq!(agg.category(Category::Vision).rating, RatingTally { sum: 9, count: 2 });
    assert!(agg.category(Category::Mobility).features.is_empty());
  }

  #[test]
  fn impossible_tally_is_rejected() {
    let err = Aggregate::from_document(json!({
      "GID": "B3",
      "hearing_accessibility_dict": { "loop": [3, 1] },
    }))
    .unwrap_err();
    assert!(matches!(err, Error::InvalidAggregate(_)));
  }

  #[test]
  fn tally_ratio_and_mean() {
    let mut t = Tally::default();
    assert_eq!(t.ratio(), None);
    t.record(true);
    t.record(false);
    assert_eq!(t.ratio(), Some(0.5));

    let mut r = RatingTally::default();
    assert_eq!(r.mean(), None);
    r.record(4);
    r.record(5);
    assert_eq!(r.mean(), Some(4.5));
  }
}
