//! Derived, read-only views over the order collection.
//!
//! Nothing here is persisted. Every value is recomputed by the store on
//! request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::order::OrderDocument;

/// Top-N cut-off for [`RegionSales`].
pub const REGION_REPORT_LIMIT: usize = 10;

/// Top-N cut-off for [`RegionCategorySales`].
pub const REGION_CATEGORY_REPORT_LIMIT: usize = 15;

// ─── Aggregations ────────────────────────────────────────────────────────────

/// Sales grouped by `region.state`, orders with a positive amount only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSales {
  pub state:           String,
  pub total_sales:     f64,
  pub order_count:     u64,
  pub total_quantity:  i64,
  pub avg_order_value: f64,
}

/// Sales grouped by `product.category`, orders with a positive amount only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySales {
  pub category:             String,
  pub total_sales:          f64,
  pub order_count:          u64,
  pub total_quantity:       i64,
  pub avg_order_value:      f64,
  /// Number of distinct `product.sku` values in the group.
  pub unique_product_count: u64,
}

/// Sales grouped by the composite key (`region.state`, `product.category`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionCategorySales {
  pub state:       String,
  pub category:    String,
  pub total_sales: f64,
  pub order_count: u64,
}

// ─── Date-range query ────────────────────────────────────────────────────────

/// Orders in a closed date interval plus client-side totals.
#[derive(Debug, Clone)]
pub struct DateRangeReport {
  pub start:          DateTime<Utc>,
  pub end:            DateTime<Utc>,
  pub orders:         Vec<OrderDocument>,
  /// Sum of `sales.amount` over exactly `orders`.
  pub total_amount:   f64,
  /// Sum of `sales.quantity` over exactly `orders`.
  pub total_quantity: u64,
}

impl DateRangeReport {
  pub fn new(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    orders: Vec<OrderDocument>,
  ) -> Self {
    let total_amount = orders.iter().map(|o| o.sales.amount).sum();
    let total_quantity = orders.iter().map(|o| u64::from(o.sales.quantity)).sum();
    Self { start, end, orders, total_amount, total_quantity }
  }
}

// ─── Write outcomes ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertSummary {
  /// Documents acknowledged by the store, summed over all batches.
  pub inserted: u64,
  /// Number of bulk-insert calls issued.
  pub batches:  usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOutcome {
  pub matched:  u64,
  /// Zero when the document already had the requested value.
  pub modified: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
  pub deleted: u64,
}

// ─── Collection statistics ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
  pub status: String,
  pub count:  u64,
}

/// Earliest and latest `date` in the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBounds {
  pub min: DateTime<Utc>,
  pub max: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionStats {
  pub total_documents: u64,
  /// Sorted by descending count.
  pub status_counts:   Vec<StatusCount>,
  /// `None` for an empty collection.
  pub date_range:      Option<DateBounds>,
}
