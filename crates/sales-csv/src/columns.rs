//! Source column names and the header lookup.
//!
//! Column names are matched exactly, including the trailing space in
//! `"Sales Channel "` that the sales export carries.

use std::collections::HashMap;

use csv::StringRecord;

pub const ORDER_ID: &str = "Order ID";
pub const DATE: &str = "Date";
pub const STATUS: &str = "Status";
pub const SHIP_CITY: &str = "ship-city";
pub const SHIP_STATE: &str = "ship-state";
pub const SHIP_POSTAL_CODE: &str = "ship-postal-code";
pub const SHIP_COUNTRY: &str = "ship-country";
pub const STYLE: &str = "Style";
pub const SKU: &str = "SKU";
pub const CATEGORY: &str = "Category";
pub const SIZE: &str = "Size";
pub const ASIN: &str = "ASIN";
pub const SALES_CHANNEL: &str = "Sales Channel ";
pub const FULFILMENT: &str = "Fulfilment";
pub const SERVICE_LEVEL: &str = "ship-service-level";
pub const QTY: &str = "Qty";
pub const CURRENCY: &str = "currency";
pub const AMOUNT: &str = "Amount";
pub const B2B: &str = "B2B";
pub const FULFILLED_BY: &str = "fulfilled-by";
pub const COURIER_STATUS: &str = "Courier Status";
pub const PROMOTION_IDS: &str = "promotion-ids";

/// Source column → destination document path.
///
/// The ship-* columns feed both `customer` and `region`.
pub const COLUMN_MAP: &[(&str, &str)] = &[
  (ORDER_ID, "order_id"),
  (DATE, "date"),
  (STATUS, "status"),
  (SHIP_CITY, "customer.city"),
  (SHIP_STATE, "customer.state"),
  (SHIP_POSTAL_CODE, "customer.postal_code"),
  (SHIP_COUNTRY, "customer.country"),
  (STYLE, "product.style"),
  (SKU, "product.sku"),
  (CATEGORY, "product.category"),
  (SIZE, "product.size"),
  (ASIN, "product.asin"),
  (SHIP_CITY, "region.city"),
  (SHIP_STATE, "region.state"),
  (SHIP_POSTAL_CODE, "region.postal_code"),
  (SHIP_COUNTRY, "region.country"),
  (SALES_CHANNEL, "sales.channel"),
  (FULFILMENT, "sales.fulfilment"),
  (SERVICE_LEVEL, "sales.service_level"),
  (QTY, "sales.quantity"),
  (CURRENCY, "sales.currency"),
  (AMOUNT, "sales.amount"),
  (B2B, "sales.b2b"),
  (FULFILLED_BY, "fulfillment.fulfilled_by"),
  (COURIER_STATUS, "fulfillment.courier_status"),
  (PROMOTION_IDS, "promotions"),
];

/// Header name → field position, built once per file.
#[derive(Debug, Clone, Default)]
pub struct Columns {
  positions: HashMap<String, usize>,
}

impl Columns {
  /// The first occurrence wins if a header name repeats.
  pub fn from_headers(headers: &StringRecord) -> Self {
    let mut positions = HashMap::new();
    for (i, name) in headers.iter().enumerate() {
      positions.entry(name.to_owned()).or_insert(i);
    }
    Self { positions }
  }

  pub fn position(&self, column: &str) -> Option<usize> {
    self.positions.get(column).copied()
  }

  /// Recognised columns that the header does not contain, each listed once.
  pub fn missing(&self) -> Vec<&'static str> {
    let mut missing: Vec<&'static str> = Vec::new();
    for (column, _) in COLUMN_MAP {
      if !self.positions.contains_key(*column) && !missing.contains(column) {
        missing.push(*column);
      }
    }
    missing
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sales_channel_keeps_trailing_space() {
    let headers = StringRecord::from(vec!["Order ID", "Sales Channel ", "Sales Channel"]);
    let cols = Columns::from_headers(&headers);
    assert_eq!(cols.position(SALES_CHANNEL), Some(1));
    assert_eq!(cols.position("Sales Channel"), Some(2));
  }

  #[test]
  fn missing_lists_each_absent_column_once() {
    let headers = StringRecord::from(vec!["Order ID", "Date", "Status"]);
    let missing = Columns::from_headers(&headers).missing();
    assert!(!missing.contains(&ORDER_ID));
    assert_eq!(missing.iter().filter(|c| **c == SHIP_CITY).count(), 1);
    assert_eq!(missing.len(), 19);
  }
}
