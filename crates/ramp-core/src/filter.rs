//! Cross-building accessibility filter.

use crate::{aggregate::Aggregate, category::Category, score::is_accessible};

/// Whether `aggregate` is accessible in every one of `needs`.
/// An empty `needs` matches everything.
pub fn accessible_for(aggregate: &Aggregate, needs: &[Category]) -> bool {
  needs
    .iter()
    .all(|c| is_accessible(&aggregate.category(*c).rating))
}

pub fn filter_accessible<'a>(
  aggregates: &'a [Aggregate],
  needs: &[Category],
) -> Vec<&'a Aggregate> {
  aggregates
    .iter()
    .filter(|a| accessible_for(a, needs))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::aggregate::RatingTally;

  fn rated(gid: &str, ratings: &[(Category, u64, u64)]) -> Aggregate {
    let mut agg = Aggregate::zeroed(gid);
    for (c, sum, count) in ratings {
      agg.category_mut(*c).rating = RatingTally { sum: *sum, count: *count };
    }
    agg
  }

  #[test]
  fn every_need_must_pass() {
    let aggs = vec![
      rated("A", &[(Category::Mobility, 5, 1), (Category::Vision, 4, 1)]),
      rated("B", &[(Category::Mobility, 5, 1), (Category::Vision, 2, 1)]),
      rated("C", &[(Category::Vision, 5, 1)]),
    ];

    let hits = filter_accessible(&aggs, &[Category::Mobility, Category::Vision]);
    let gids: Vec<&str> = hits.iter().map(|a| a.gid.as_str()).collect();
    assert_eq!(gids, vec!["A"]);
  }

  #[test]
  fn no_needs_matches_all() {
    let aggs = vec![Aggregate::zeroed("A"), Aggregate::zeroed("B")];
    assert_eq!(filter_accessible(&aggs, &[]).len(), 2);
  }
}
