//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite.
//!
//! Documents are stored as compact JSON. Timestamps inside them use the
//! fixed-width format from [`sales_core::timestamp`], so the same encoding is
//! used for query bounds.

use chrono::{DateTime, Utc};
use sales_core::{
  index::{IndexInfo, SortDirection, is_valid_field_path},
  order::OrderDocument,
  timestamp,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { timestamp::format(dt) }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  timestamp::parse(s).ok_or_else(|| Error::DateParse(format!("invalid timestamp: {s:?}")))
}

// ─── Documents ───────────────────────────────────────────────────────────────

pub fn encode_doc(order: &OrderDocument) -> Result<String> {
  Ok(order.to_json()?.to_string())
}

pub fn decode_doc(s: &str) -> Result<OrderDocument> {
  let value: serde_json::Value = serde_json::from_str(s)?;
  Ok(OrderDocument::from_json(value)?)
}

// ─── Field paths ─────────────────────────────────────────────────────────────

/// SQL expression selecting a document field, e.g.
/// `json_extract(doc, '$.region.state')`.
///
/// The path is spliced into SQL text, so it is validated first.
pub fn field_expr(field: &str) -> Result<String> {
  if !is_valid_field_path(field) {
    return Err(Error::InvalidFieldPath(field.to_owned()));
  }
  Ok(format!("json_extract(doc, '$.{field}')"))
}

/// Double-quote an identifier for SQLite.
pub fn quote_ident(name: &str) -> String { format!("\"{}\"", name.replace('"', "\"\"")) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read from an `order_indexes` row.
pub struct RawIndex {
  pub name:      String,
  pub field:     String,
  pub direction: i32,
}

impl RawIndex {
  pub fn into_info(self) -> Result<IndexInfo> {
    let direction = SortDirection::from_i32(self.direction).ok_or_else(|| {
      Error::InvalidDirection { name: self.name.clone(), direction: self.direction }
    })?;
    Ok(IndexInfo { name: self.name, field: self.field, direction })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn field_expr_rejects_injection() {
    assert_eq!(
      field_expr("sales.amount").unwrap(),
      "json_extract(doc, '$.sales.amount')"
    );
    assert!(matches!(
      field_expr("x') OR 1=1 --"),
      Err(Error::InvalidFieldPath(_))
    ));
  }

  #[test]
  fn quote_ident_escapes_quotes() {
    assert_eq!(quote_ident("sales.amount_-1"), "\"sales.amount_-1\"");
    assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
  }
}
