//! Derived accessibility scores. Never stored.
//!
//! A score is the mean rating as a percentage of the maximum rating:
//! `sum / (count * 5) * 100`, or `0` when nothing was rated.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
  aggregate::{Aggregate, RatingTally},
  category::Category,
  review::MAX_RATING,
};

/// Minimum score for a category to count as accessible.
pub const ACCESSIBLE_THRESHOLD: u64 = 66;

pub fn score(rating: &RatingTally) -> f64 {
  if rating.count == 0 {
    return 0.0;
  }
  // sum * (100 / 5) keeps whole-number boundaries exact.
  (rating.sum * (100 / u64::from(MAX_RATING))) as f64 / rating.count as f64
}

/// `score >= 66`, evaluated in integers.
pub fn is_accessible(rating: &RatingTally) -> bool {
  rating.count > 0
    && rating.sum * 100 >= ACCESSIBLE_THRESHOLD * rating.count * u64::from(MAX_RATING)
}

/// One category's score as served to callers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryScore {
  pub score:      f64,
  pub rated:      u64,
  pub accessible: bool,
}

impl CategoryScore {
  pub fn of(rating: &RatingTally) -> Self {
    Self {
      score:      score(rating),
      rated:      rating.count,
      accessible: is_accessible(rating),
    }
  }
}

/// Scores for every category of one aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryScores {
  #[serde(rename = "GID")]
  pub gid:    String,
  pub scores: BTreeMap<Category, CategoryScore>,
}

impl CategoryScores {
  pub fn of(aggregate: &Aggregate) -> Self {
    Self {
      gid:    aggregate.gid.clone(),
      scores: Category::all()
        .map(|c| (c, CategoryScore::of(&aggregate.category(c).rating)))
        .collect(),
    }
  }
}
