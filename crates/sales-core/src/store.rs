//! The `SalesStore` trait.
//!
//! Implemented by storage backends (e.g. `sales-store-sqlite`). The gateway
//! and the index provisioner are generic over this abstraction; neither knows
//! how documents are laid out on disk.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::{
  index::{IndexInfo, IndexSpec},
  order::OrderDocument,
  report::{
    CategorySales, DateBounds, DeleteOutcome, RegionCategorySales, RegionSales,
    StatusCount, UpdateOutcome,
  },
};

/// Abstraction over an order-document store.
///
/// Every call is a single round trip. Nothing is retried and no atomicity
/// spans two calls.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait SalesStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Indexes ───────────────────────────────────────────────────────────

  /// Create a single-field index. Creating an index that already exists is
  /// not an error. Returns the index name.
  fn create_index<'a>(
    &'a self,
    spec: &'a IndexSpec,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;

  /// Every index currently defined on the order collection.
  fn list_indexes(
    &self,
  ) -> impl Future<Output = Result<Vec<IndexInfo>, Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Bulk insert. Returns the number of documents the store acknowledged.
  fn insert_many<'a>(
    &'a self,
    orders: &'a [OrderDocument],
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  /// Overwrite `status` on the first document whose `order_id` matches.
  fn update_status<'a>(
    &'a self,
    order_id: &'a str,
    status: &'a str,
  ) -> impl Future<Output = Result<UpdateOutcome, Self::Error>> + Send + 'a;

  /// Remove the first document whose `order_id` matches.
  fn delete_one<'a>(
    &'a self,
    order_id: &'a str,
  ) -> impl Future<Output = Result<DeleteOutcome, Self::Error>> + Send + 'a;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Up to `limit` documents (all when `None`) in natural retrieval order.
  fn find(
    &self,
    limit: Option<usize>,
  ) -> impl Future<Output = Result<Vec<OrderDocument>, Self::Error>> + Send + '_;

  /// All documents with `start <= date <= end`.
  fn find_by_date_range(
    &self,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
  ) -> impl Future<Output = Result<Vec<OrderDocument>, Self::Error>> + Send + '_;

  // ── Aggregations ──────────────────────────────────────────────────────
  //
  // All three consider only documents with `sales.amount > 0` and return
  // groups sorted by descending total amount.

  fn aggregate_by_region(
    &self,
    limit: Option<usize>,
  ) -> impl Future<Output = Result<Vec<RegionSales>, Self::Error>> + Send + '_;

  fn aggregate_by_category(
    &self,
    limit: Option<usize>,
  ) -> impl Future<Output = Result<Vec<CategorySales>, Self::Error>> + Send + '_;

  fn aggregate_by_region_and_category(
    &self,
    limit: Option<usize>,
  ) -> impl Future<Output = Result<Vec<RegionCategorySales>, Self::Error>> + Send + '_;

  // ── Statistics ────────────────────────────────────────────────────────

  fn count(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Documents per distinct `status`, sorted by descending count.
  fn status_counts(
    &self,
  ) -> impl Future<Output = Result<Vec<StatusCount>, Self::Error>> + Send + '_;

  /// Minimum and maximum `date`; `None` when the collection is empty.
  fn date_bounds(
    &self,
  ) -> impl Future<Output = Result<Option<DateBounds>, Self::Error>> + Send + '_;

  // ── Lifecycle ─────────────────────────────────────────────────────────

  /// Release the underlying connection.
  fn close(self) -> impl Future<Output = Result<(), Self::Error>> + Send
  where
    Self: Sized;
}
