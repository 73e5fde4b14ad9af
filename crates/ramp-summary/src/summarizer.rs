//! [`Summarizer`] turns an aggregate into one short narrative per category.

use std::{collections::BTreeMap, fmt::Write as _, time::Duration};

use ramp_core::{
  aggregate::{Aggregate, CategoryAggregate, RatingTally},
  category::Category,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{GenerationError, generator::TextGenerator};

/// Synopsis used when a category has no comments; no model call is made.
pub const NO_COMMENTS: &str = "No comments have been submitted for this category.";
/// Synopsis used when the model call fails or times out.
pub const UNAVAILABLE: &str = "A summary of the comments is currently unavailable.";
/// Rating display for a category nobody rated.
pub const NO_RATINGS: &str = "no ratings available";

const SYSTEM_PROMPT: &str = "You summarize crowdsourced accessibility reviews of a \
building. Reply with two or three plain sentences. Mention concrete barriers and \
accommodations the reviewers agree on; do not invent details.";

/// Share of "true" answers at or above which a sub-feature is available.
const AVAILABLE_RATIO: f64 = 0.5;

// ─── Output types ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Availability {
  Available,
  Limited,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureStatus {
  pub name:   String,
  pub status: Availability,
  pub yes:    u64,
  pub total:  u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
  pub category:  Category,
  /// Sub-features with at least one answer, by name.
  pub features:  Vec<FeatureStatus>,
  /// e.g. `"4.3 out of 5"` or [`NO_RATINGS`].
  pub rating:    String,
  pub synopsis:  String,
  pub narrative: String,
}

impl CategorySummary {
  fn new(
    category: Category,
    features: Vec<FeatureStatus>,
    rating: String,
    synopsis: String,
  ) -> Self {
    let mut narrative = format!("{}: {}.", category.display_name(), rating);
    if features.is_empty() {
      narrative.push_str(" No features reported.");
    } else {
      let listed: Vec<String> = features
        .iter()
        .map(|f| format!("{} ({:?})", f.name, f.status))
        .collect();
      let _ = write!(narrative, " Features: {}.", listed.join(", "));
    }
    narrative.push(' ');
    narrative.push_str(&synopsis);

    Self { category, features, rating, synopsis, narrative }
  }
}

// ─── Formatting ──────────────────────────────────────────────────────────────

pub fn feature_statuses(aggregate: &CategoryAggregate) -> Vec<FeatureStatus> {
  aggregate
    .features
    .iter()
    .filter_map(|(name, tally)| {
      let ratio = tally.ratio()?;
      Some(FeatureStatus {
        name:   name.clone(),
        status: if ratio >= AVAILABLE_RATIO {
          Availability::Available
        } else {
          Availability::Limited
        },
        yes:    tally.yes,
        total:  tally.total,
      })
    })
    .collect()
}

pub fn rating_display(rating: &RatingTally) -> String {
  match rating.mean() {
    Some(mean) => format!("{mean:.1} out of 5"),
    None => NO_RATINGS.to_owned(),
  }
}

fn user_prompt(category: Category, texts: &[String]) -> String {
  let mut prompt = format!(
    "Summarize these {} comments:\n",
    category.display_name()
  );
  for text in texts {
    let _ = writeln!(prompt, "- {text}");
  }
  prompt
}

// ─── Summarizer ──────────────────────────────────────────────────────────────

/// Describes aggregates, asking `generator` for one synopsis per category
/// that has comments. Calls are sequential and individually bounded by
/// `timeout`.
pub struct Summarizer<G> {
  generator: G,
  timeout:   Duration,
}

impl<G: TextGenerator> Summarizer<G> {
  pub fn new(generator: G, timeout: Duration) -> Self { Self { generator, timeout } }

  pub async fn describe(&self, aggregate: &Aggregate) -> BTreeMap<Category, CategorySummary> {
    let mut out = BTreeMap::new();
    for category in Category::all() {
      let agg = aggregate.category(category);
      let synopsis = self.synopsis(&aggregate.gid, category, &agg.texts).await;
      out.insert(
        category,
        CategorySummary::new(
          category,
          feature_statuses(agg),
          rating_display(&agg.rating),
          synopsis,
        ),
      );
    }
    out
  }

  async fn synopsis(&self, gid: &str, category: Category, texts: &[String]) -> String {
    if texts.is_empty() {
      return NO_COMMENTS.to_owned();
    }

    let prompt = user_prompt(category, texts);
    let call = self.generator.complete(SYSTEM_PROMPT, &prompt);
    let result = match tokio::time::timeout(self.timeout, call).await {
      Ok(result) => result,
      Err(_) => Err(GenerationError::Timeout(self.timeout)),
    };

    match result {
      Ok(text) if !text.trim().is_empty() => {
        debug!(gid, category = category.prefix(), "generated synopsis");
        text.trim().to_owned()
      }
      Ok(_) => {
        warn!(gid, category = category.prefix(), "model returned blank synopsis");
        UNAVAILABLE.to_owned()
      }
      Err(e) => {
        warn!(gid, category = category.prefix(), error = %e, "synopsis generation failed");
        UNAVAILABLE.to_owned()
      }
    }
  }
}
