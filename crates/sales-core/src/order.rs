//! Order documents — the unit of storage.
//!
//! One document is built per source row. Everything known about the order
//! (customer, product, sales figures, fulfillment) is nested inside it, so
//! reads never need to join anything.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Result;

// ─── Nested records ──────────────────────────────────────────────────────────

/// A shipping location. Used for both `customer` and `region`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
  pub city:        String,
  pub state:       String,
  pub postal_code: String,
  pub country:     String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
  pub style:    String,
  pub sku:      String,
  /// Free-form; the source data is uncontrolled.
  pub category: String,
  pub size:     String,
  pub asin:     String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sales {
  pub channel:       String,
  pub fulfilment:    String,
  pub service_level: String,
  pub quantity:      u32,
  pub currency:      String,
  /// Always finite and non-negative.
  pub amount:        f64,
  pub b2b:           bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fulfillment {
  pub fulfilled_by:   String,
  pub courier_status: String,
}

// ─── Document ────────────────────────────────────────────────────────────────

/// A denormalised order.
///
/// `order_id` is the business key. It is expected to be unique but nothing
/// enforces that; updates and deletes act on the first match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDocument {
  pub order_id:    String,
  #[serde(with = "crate::timestamp")]
  pub date:        DateTime<Utc>,
  pub status:      String,
  pub customer:    Location,
  pub product:     Product,
  /// Same shape as `customer`; in the sales report it is always a copy.
  pub region:      Location,
  pub sales:       Sales,
  pub fulfillment: Fulfillment,
  pub promotions:  Vec<String>,
}

impl OrderDocument {
  /// Serialise to the JSON body stored by document backends.
  pub fn to_json(&self) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(self)?)
  }

  /// Inverse of [`OrderDocument::to_json`].
  pub fn from_json(value: serde_json::Value) -> Result<Self> {
    Ok(serde_json::from_value(value)?)
  }
}
