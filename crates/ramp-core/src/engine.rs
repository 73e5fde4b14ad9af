//! [`AggregationEngine`] recomputes and serves per-building aggregates.
//!
//! Every recompute is a full read-fold-replace cycle against the store. There
//! is no cross-request locking: two concurrent recomputes of one building both
//! overwrite the document and the last write wins. Because each write is a
//! pure function of the reviews visible at scan time, this only matters while
//! reviews are being inserted concurrently.

use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  aggregate::Aggregate,
  building::Building,
  fold::fold,
  review::Review,
  store::AccessStore,
};

fn store_error<E: Into<Error>>(e: E) -> Error { e.into() }

/// The aggregation engine, holding an explicit store handle.
pub struct AggregationEngine<S> {
  store: S,
}

impl<S: AccessStore> AggregationEngine<S> {
  pub fn new(store: S) -> Self { Self { store } }

  pub fn store(&self) -> &S { &self.store }

  /// Return the stored aggregate for `gid`, creating a zeroed one first if
  /// none exists.
  pub async fn load_or_init(&self, gid: &str) -> Result<Aggregate> {
    if let Some(existing) = self.store.get_aggregate(gid).await.map_err(store_error)? {
      return Ok(existing);
    }

    let aggregate = self
      .store
      .upsert_aggregate_if_absent(&Aggregate::zeroed(gid))
      .await
      .map_err(store_error)?;
    debug!(gid, "initialised aggregate");
    Ok(aggregate)
  }

  /// Return the stored aggregate for `gid` without creating one.
  pub async fn fetch(&self, gid: &str) -> Result<Aggregate> {
    self
      .store
      .get_aggregate(gid)
      .await
      .map_err(store_error)?
      .ok_or_else(|| Error::AggregateNotFound(gid.to_owned()))
  }

  /// Overwrite the stored document for `aggregate.gid`.
  pub async fn persist(&self, aggregate: &Aggregate) -> Result<()> {
    self
      .store
      .replace_aggregate(aggregate)
      .await
      .map_err(store_error)
  }

  /// Every stored aggregate.
  pub async fn list(&self) -> Result<Vec<Aggregate>> {
    self.store.list_aggregates().await.map_err(store_error)
  }

  pub async fn building(&self, gid: &str) -> Result<Option<Building>> {
    self.store.get_building(gid).await.map_err(store_error)
  }

  /// Rebuild the aggregate for `gid` from every stored review and persist it.
  ///
  /// Reviews that fail validation are logged and left out; they never abort
  /// the recompute.
  pub async fn recompute(&self, gid: &str) -> Result<Aggregate> {
    // Only existence matters; the stored body is never decoded.
    self
      .store
      .ensure_aggregate(&Aggregate::zeroed(gid))
      .await
      .map_err(store_error)?;

    let documents = self
      .store
      .reviews_for_building(gid)
      .await
      .map_err(store_error)?;
    let scanned = documents.len();

    let reviews: Vec<Review> = documents
      .into_iter()
      .filter_map(|doc| match Review::from_document(doc) {
        Ok(review) if review.gid == gid => Some(review),
        Ok(review) => {
          warn!(
            gid,
            review_id = %review.review_id,
            body_gid = %review.gid,
            "skipping review filed under another building"
          );
          None
        }
        Err(e) => {
          warn!(gid, error = %e, "skipping malformed review");
          None
        }
      })
      .collect();
    let folded = reviews.len();

    let aggregate = fold(gid, reviews);
    self.persist(&aggregate).await?;

    info!(gid, scanned, folded, "recomputed aggregate");
    Ok(aggregate)
  }

  /// [`recompute`](Self::recompute), then dump the resulting document at
  /// `debug` level.
  pub async fn debug_recompute(&self, gid: &str) -> Result<Aggregate> {
    let aggregate = self.recompute(gid).await?;
    let document = aggregate.to_document()?;
    debug!(gid, %document, "raw aggregate");
    Ok(aggregate)
  }
}
