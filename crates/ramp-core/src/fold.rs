//! The fold: the deterministic reduction of a building's reviews into an
//! [`Aggregate`].
//!
//! The result depends only on the multiset of reviews: it always starts from
//! [`Aggregate::zeroed`] and scans reviews in `(seq, review_id)` order, so
//! comment lists are reproducible as well.

use crate::{
  aggregate::Aggregate,
  category::Category,
  review::{Review, parse_flag},
};

/// Fold `reviews` into a fresh aggregate for `gid`.
pub fn fold(gid: &str, reviews: impl IntoIterator<Item = Review>) -> Aggregate {
  let mut reviews: Vec<Review> = reviews.into_iter().collect();
  reviews.sort_by_key(|r| (r.seq, r.review_id));

  let mut aggregate = Aggregate::zeroed(gid);
  for review in &reviews {
    apply(&mut aggregate, review);
  }
  aggregate
}

/// Add one review's answers, rating and comment to every category.
fn apply(aggregate: &mut Aggregate, review: &Review) {
  for category in Category::all() {
    let input = review.category(category);
    let acc = aggregate.category_mut(category);

    for (name, raw) in &input.features {
      if let Some(answer) = parse_flag(raw) {
        acc.features.entry(name.clone()).or_default().record(answer);
      }
    }

    // 0 is "not rated", never a score.
    if input.rating != 0 {
      acc.rating.record(input.rating);
    }

    if let Some(comment) = input.comment() {
      acc.texts.push(comment.to_owned());
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use serde_json::{Value, json};
  use uuid::Uuid;

  use super::*;
  use crate::{
    aggregate::{RatingTally, Tally},
    review::ReviewDocument,
  };

  fn review(seq: i64, body: Value) -> Review {
    Review::from_document(ReviewDocument {
      review_id: Uuid::new_v4(),
      seq,
      recorded_at: Utc::now(),
      body,
    })
    .unwrap()
  }

  #[test]
  fn two_review_mobility_scenario() {
    let a = review(1, json!({
      "GID": "B1",
      "mobility_accessibility_dict": { "ramp": "true" },
      "mobility_accessibility_rating": 4,
    }));
    let b = review(2, json!({
      "GID": "B1",
      "mobility_accessibility_dict": { "ramp": "false" },
      "mobility_accessibility_rating": 0,
    }));

    let agg = fold("B1", [a, b]);
    let mobility = agg.category(Category::Mobility);
    assert_eq!(mobility.features["ramp"], Tally { yes: 1, total: 2 });
    assert_eq!(mobility.rating, RatingTally { sum: 4, count: 1 });
  }

  #[test]
  fn zero_rating_is_not_counted() {
    let agg = fold("B1", [review(1, json!({
      "GID": "B1",
      "vision_accessibility_rating": 0,
    }))]);
    assert_eq!(agg.category(Category::Vision).rating, RatingTally::default());
  }

  #[test]
  fn unanswered_features_do_not_count() {
    let agg = fold("B1", [review(1, json!({
      "GID": "B1",
      "sensory_considerations_dict": {
        "quietroom": "TRUE",
        "dimlighting": "maybe",
        "scentfree": "",
      },
    }))]);
    let sensory = agg.category(Category::Sensory);
    assert_eq!(sensory.features.len(), 1);
    assert_eq!(sensory.features["quietroom"], Tally { yes: 1, total: 1 });
  }

  #[test]
  fn no_reviews_yields_zeroed_aggregate() {
    assert_eq!(fold("B9", Vec::new()), Aggregate::zeroed("B9"));
  }

  #[test]
  fn comments_follow_sequence_order_not_input_order() {
    let first = review(1, json!({ "GID": "B1", "overall_inclusivity_text": " first " }));
    let blank = review(2, json!({ "GID": "B1", "overall_inclusivity_text": "   " }));
    let last = review(3, json!({ "GID": "B1", "overall_inclusivity_text": "last" }));

    let agg = fold("B1", [last, blank, first]);
    assert_eq!(agg.category(Category::Overall).texts, vec!["first", "last"]);
  }

  #[test]
  fn fold_is_order_independent_and_repeatable() {
    let bodies = [
      json!({ "GID": "B1", "bathroom_accessibility_dict": { "grabbars": "true" }, "bathroom_accessibility_rating": 5 }),
      json!({ "GID": "B1", "bathroom_accessibility_dict": { "grabbars": "false", "widestall": "true" }, "bathroom_accessibility_rating": 3 }),
      json!({ "GID": "B1", "bathroom_accessibility_dict": { "grabbars": "true" }, "bathroom_accessibility_rating": 0 }),
    ];
    let reviews: Vec<Review> = bodies
      .iter()
      .enumerate()
      .map(|(i, b)| review(i as i64, b.clone()))
      .collect();

    let forward = fold("B1", reviews.clone());
    let backward = fold("B1", reviews.iter().rev().cloned());
    let again = fold("B1", reviews);

    assert_eq!(forward, backward);
    assert_eq!(forward, again);

    let bathroom = forward.category(Category::Bathroom);
    assert_eq!(bathroom.features["grabbars"], Tally { yes: 2, total: 3 });
    assert_eq!(bathroom.features["widestall"], Tally { yes: 1, total: 1 });
    assert_eq!(bathroom.rating, RatingTally { sum: 8, count: 2 });
    for tally in bathroom.features.values() {
      assert!(tally.yes <= tally.total);
    }
  }
}
