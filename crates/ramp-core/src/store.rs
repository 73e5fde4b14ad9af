//! The `AccessStore` trait: the document store behind the engine.
//!
//! The trait is implemented by storage backends (e.g. `ramp-store-sqlite`).
//! Higher layers (`ramp-api`, `ramp-server`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::{aggregate::Aggregate, building::Building, review::ReviewDocument};

/// Abstraction over the three collections the aggregation engine touches:
/// reviews (read-only), aggregates (one document per building identifier),
/// and buildings (read-only).
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait AccessStore: Send + Sync {
  /// Backend failures become [`Error::StorageUnavailable`](crate::Error);
  /// an unreadable stored document keeps its own [`crate::Error`] variant.
  type Error: std::error::Error + Send + Sync + 'static + Into<crate::Error>;

  // ── Reviews ───────────────────────────────────────────────────────────

  /// Every stored review whose building identifier is `gid`, unvalidated.
  /// Order is unspecified; each document carries its insertion `seq`.
  fn reviews_for_building<'a>(
    &'a self,
    gid: &'a str,
  ) -> impl Future<Output = Result<Vec<ReviewDocument>, Self::Error>> + Send + 'a;

  // ── Aggregates ────────────────────────────────────────────────────────

  /// Retrieve the aggregate for `gid`. Returns `None` if never created.
  fn get_aggregate<'a>(
    &'a self,
    gid: &'a str,
  ) -> impl Future<Output = Result<Option<Aggregate>, Self::Error>> + Send + 'a;

  /// Insert `initial` unless an aggregate already exists for its `gid`, then
  /// return whichever document is stored. Concurrent callers for the same
  /// `gid` must all observe a single record.
  fn upsert_aggregate_if_absent<'a>(
    &'a self,
    initial: &'a Aggregate,
  ) -> impl Future<Output = Result<Aggregate, Self::Error>> + Send + 'a;

  /// Insert `initial` unless an aggregate already exists for its `gid`.
  /// The stored document, if any, is neither read nor decoded.
  fn ensure_aggregate<'a>(
    &'a self,
    initial: &'a Aggregate,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Overwrite the whole document stored under `aggregate.gid`.
  fn replace_aggregate<'a>(
    &'a self,
    aggregate: &'a Aggregate,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Every stored aggregate, ordered by building identifier.
  fn list_aggregates(
    &self,
  ) -> impl Future<Output = Result<Vec<Aggregate>, Self::Error>> + Send + '_;

  // ── Buildings ─────────────────────────────────────────────────────────

  /// Retrieve a building by identifier. Returns `None` if not found.
  fn get_building<'a>(
    &'a self,
    gid: &'a str,
  ) -> impl Future<Output = Result<Option<Building>, Self::Error>> + Send + 'a;
}
