//! [`SalesGateway`] — the sales operations over a single store handle.
//!
//! The gateway owns the store for the whole run. It is constructed once,
//! passed by reference to whatever needs it, and released with
//! [`SalesGateway::close`].

use crate::{
  Error, Result,
  date::parse_date,
  order::OrderDocument,
  report::{
    CategorySales, CollectionStats, DateRangeReport, DeleteOutcome,
    InsertSummary, REGION_CATEGORY_REPORT_LIMIT, REGION_REPORT_LIMIT,
    RegionCategorySales, RegionSales, UpdateOutcome,
  },
  store::SalesStore,
};

/// Default number of documents per bulk-insert call.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

pub struct SalesGateway<S> {
  store: S,
}

impl<S: SalesStore> SalesGateway<S> {
  pub fn new(store: S) -> Self { Self { store } }

  pub fn store(&self) -> &S { &self.store }

  /// Release the store connection.
  pub async fn close(self) -> Result<()> {
    self.store.close().await.map_err(Error::store)?;
    tracing::info!("store connection closed");
    Ok(())
  }

  /// Release the store once a sequence of operations has finished, however
  /// it finished. A failed `outcome` is logged before the connection is
  /// closed, and the outcome is handed back unchanged. A failure to close is
  /// only logged.
  pub async fn close_after<T, E: std::fmt::Debug>(
    self,
    outcome: std::result::Result<T, E>,
  ) -> std::result::Result<T, E> {
    if let Err(e) = &outcome {
      tracing::error!("{e:?}");
    }
    if let Err(e) = self.close().await {
      tracing::warn!("failed to close store: {e}");
    }
    outcome
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// Insert `orders` in contiguous chunks of at most `batch_size`.
  ///
  /// One bulk-insert call is issued per chunk. A failure part-way leaves
  /// the earlier chunks in place.
  pub async fn insert(
    &self,
    orders: &[OrderDocument],
    batch_size: usize,
  ) -> Result<InsertSummary> {
    if batch_size == 0 {
      return Err(Error::InvalidBatchSize);
    }

    tracing::info!("inserting {} documents", orders.len());
    let mut summary = InsertSummary::default();

    for batch in orders.chunks(batch_size) {
      let acknowledged = self
        .store
        .insert_many(batch)
        .await
        .map_err(Error::store)?;
      summary.inserted += acknowledged;
      summary.batches += 1;
      tracing::info!("inserted batch: {}/{} documents", summary.inserted, orders.len());
    }

    Ok(summary)
  }

  pub async fn update_status(
    &self,
    order_id: &str,
    new_status: &str,
  ) -> Result<UpdateOutcome> {
    let outcome = self
      .store
      .update_status(order_id, new_status)
      .await
      .map_err(Error::store)?;
    if outcome.matched == 0 {
      tracing::info!(order_id, "order not found");
    } else {
      tracing::info!(order_id, modified = outcome.modified, "status set to {new_status:?}");
    }
    Ok(outcome)
  }

  pub async fn delete(&self, order_id: &str) -> Result<DeleteOutcome> {
    let outcome = self.store.delete_one(order_id).await.map_err(Error::store)?;
    if outcome.deleted == 0 {
      tracing::info!(order_id, "order not found");
    } else {
      tracing::info!(order_id, "order deleted");
    }
    Ok(outcome)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  pub async fn read(&self, limit: usize) -> Result<Vec<OrderDocument>> {
    self.store.find(Some(limit)).await.map_err(Error::store)
  }

  /// Orders with `start <= date <= end`, both bounds given as free-form
  /// date strings. Totals are summed here over the returned set.
  pub async fn query_by_date_range(
    &self,
    start: &str,
    end: &str,
  ) -> Result<DateRangeReport> {
    let start_dt = parse_date(start).ok_or_else(|| Error::InvalidDate(start.to_owned()))?;
    let end_dt = parse_date(end).ok_or_else(|| Error::InvalidDate(end.to_owned()))?;

    let orders = self
      .store
      .find_by_date_range(start_dt, end_dt)
      .await
      .map_err(Error::store)?;

    Ok(DateRangeReport::new(start_dt, end_dt, orders))
  }

  // ── Aggregations ──────────────────────────────────────────────────────────

  /// Top states by total sales.
  pub async fn aggregate_by_region(&self) -> Result<Vec<RegionSales>> {
    self
      .store
      .aggregate_by_region(Some(REGION_REPORT_LIMIT))
      .await
      .map_err(Error::store)
  }

  /// Every category, by total sales.
  pub async fn aggregate_by_category(&self) -> Result<Vec<CategorySales>> {
    self.store.aggregate_by_category(None).await.map_err(Error::store)
  }

  /// Top (state, category) pairs by total sales.
  pub async fn aggregate_by_region_and_category(
    &self,
  ) -> Result<Vec<RegionCategorySales>> {
    self
      .store
      .aggregate_by_region_and_category(Some(REGION_CATEGORY_REPORT_LIMIT))
      .await
      .map_err(Error::store)
  }

  // ── Statistics ────────────────────────────────────────────────────────────

  pub async fn stats(&self) -> Result<CollectionStats> {
    let total_documents = self.store.count().await.map_err(Error::store)?;
    let status_counts = self.store.status_counts().await.map_err(Error::store)?;
    let date_range = self.store.date_bounds().await.map_err(Error::store)?;

    Ok(CollectionStats { total_documents, status_counts, date_range })
  }
}
