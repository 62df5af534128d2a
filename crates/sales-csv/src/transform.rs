//! Row-to-document transformation.
//!
//! Pipeline:
//!   csv reader
//!     └─ Columns::from_headers() → header lookup
//!          └─ Row (one StringRecord) → typed cell accessors
//!               └─ Transformer::transform_row() → OrderDocument

use std::{fs::File, io, path::Path, str::FromStr};

use chrono::{DateTime, SubsecRound, Utc};
use csv::StringRecord;
use sales_core::{
  date::parse_date,
  order::{Fulfillment, Location, OrderDocument, Product, Sales},
};
use serde::Deserialize;

use crate::{
  columns::*,
  error::{Error, Result},
};

// ─── Date fallback policy ────────────────────────────────────────────────────

/// What to do with a `Date` cell the parser cannot read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFallback {
  /// Substitute the wall-clock time at transformation. Counted in
  /// [`Transformed::date_fallbacks`].
  #[default]
  Now,
  /// Fail the whole transformation.
  Reject,
}

impl FromStr for DateFallback {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "now" => Ok(Self::Now),
      "reject" => Ok(Self::Reject),
      other => Err(format!("unknown date fallback {other:?} (expected now|reject)")),
    }
  }
}

// ─── Rows ────────────────────────────────────────────────────────────────────

/// One data record viewed through the header lookup.
pub struct Row<'a> {
  columns: &'a Columns,
  record:  &'a StringRecord,
}

impl<'a> Row<'a> {
  pub fn new(columns: &'a Columns, record: &'a StringRecord) -> Self {
    Self { columns, record }
  }

  /// The raw cell, or `None` if the column is absent or the cell empty.
  pub fn cell(&self, column: &str) -> Option<&'a str> {
    self
      .columns
      .position(column)
      .and_then(|i| self.record.get(i))
      .filter(|s| !s.is_empty())
  }

  pub fn text(&self, column: &str) -> String {
    self.cell(column).unwrap_or_default().to_owned()
  }

  /// Non-negative integer; 0 when absent or not a number. Decimal cells
  /// (`"2.0"`) truncate.
  pub fn quantity(&self, column: &str) -> u32 {
    let Some(raw) = self.cell(column).map(str::trim) else {
      return 0;
    };
    if let Ok(n) = raw.parse::<i64>() {
      return n.clamp(0, i64::from(u32::MAX)) as u32;
    }
    match raw.parse::<f64>() {
      Ok(f) if f.is_finite() => f.clamp(0.0, f64::from(u32::MAX)) as u32,
      _ => 0,
    }
  }

  /// Finite non-negative float; 0.0 when absent or not a number.
  pub fn amount(&self, column: &str) -> f64 {
    self
      .cell(column)
      .and_then(|s| s.trim().parse::<f64>().ok())
      .filter(|f| f.is_finite())
      .map_or(0.0, |f| f.max(0.0))
  }

  /// `true` only for a case-insensitive `"true"`.
  pub fn flag(&self, column: &str) -> bool {
    self
      .cell(column)
      .is_some_and(|s| s.eq_ignore_ascii_case("true"))
  }

  /// Comma-separated list with tokens trimmed and empties dropped.
  pub fn list(&self, column: &str) -> Vec<String> {
    self
      .cell(column)
      .map(split_list)
      .unwrap_or_default()
  }
}

fn split_list(s: &str) -> Vec<String> {
  s.split(',')
    .map(str::trim)
    .filter(|p| !p.is_empty())
    .map(str::to_owned)
    .collect()
}

// ─── Transformer ─────────────────────────────────────────────────────────────

/// Output of a whole-file transformation.
#[derive(Debug, Clone, Default)]
pub struct Transformed {
  /// One document per data row, in file order.
  pub orders:         Vec<OrderDocument>,
  /// Rows whose date could not be parsed and received the current time.
  pub date_fallbacks: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Transformer {
  fallback: DateFallback,
}

impl Transformer {
  pub fn new(fallback: DateFallback) -> Self { Self { fallback } }

  pub fn transform_path(&self, path: impl AsRef<Path>) -> Result<Transformed> {
    let path = path.as_ref();
    tracing::info!("reading CSV file: {}", path.display());
    let file = File::open(path)?;
    self.transform_reader(io::BufReader::new(file))
  }

  pub fn transform_reader<R: io::Read>(&self, reader: R) -> Result<Transformed> {
    let mut csv = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns = Columns::from_headers(csv.headers()?);

    let missing = columns.missing();
    if !missing.is_empty() {
      tracing::warn!("CSV is missing columns {missing:?}; their fields take defaults");
    }

    let mut out = Transformed::default();
    let mut record = StringRecord::new();
    let mut row_number = 0usize;

    while csv.read_record(&mut record)? {
      row_number += 1;
      let (order, fell_back) = self.transform_row(&Row::new(&columns, &record), row_number)?;
      if fell_back {
        out.date_fallbacks += 1;
      }
      out.orders.push(order);
    }

    if out.date_fallbacks > 0 {
      tracing::warn!(
        "{} of {} rows had an unparseable date and were stamped with the current time",
        out.date_fallbacks,
        out.orders.len()
      );
    }
    tracing::info!("transformed {} rows into documents", out.orders.len());
    Ok(out)
  }

  /// Build one document. The flag is `true` when the date fallback was
  /// applied. `row_number` is 1-based and only used for error reporting.
  pub fn transform_row(
    &self,
    row: &Row<'_>,
    row_number: usize,
  ) -> Result<(OrderDocument, bool)> {
    let (date, fell_back) = self.resolve_date(row.cell(DATE), row_number)?;

    let location = Location {
      city:        row.text(SHIP_CITY),
      state:       row.text(SHIP_STATE),
      postal_code: row.text(SHIP_POSTAL_CODE),
      country:     row.text(SHIP_COUNTRY),
    };

    let order = OrderDocument {
      order_id: row.text(ORDER_ID),
      date,
      status: row.text(STATUS),
      customer: location.clone(),
      product: Product {
        style:    row.text(STYLE),
        sku:      row.text(SKU),
        category: row.text(CATEGORY),
        size:     row.text(SIZE),
        asin:     row.text(ASIN),
      },
      region: location,
      sales: Sales {
        channel:       row.text(SALES_CHANNEL),
        fulfilment:    row.text(FULFILMENT),
        service_level: row.text(SERVICE_LEVEL),
        quantity:      row.quantity(QTY),
        currency:      row.text(CURRENCY),
        amount:        row.amount(AMOUNT),
        b2b:           row.flag(B2B),
      },
      fulfillment: Fulfillment {
        fulfilled_by:   row.text(FULFILLED_BY),
        courier_status: row.text(COURIER_STATUS),
      },
      promotions: row.list(PROMOTION_IDS),
    };

    Ok((order, fell_back))
  }

  fn resolve_date(
    &self,
    cell: Option<&str>,
    row_number: usize,
  ) -> Result<(DateTime<Utc>, bool)> {
    if let Some(dt) = cell.and_then(parse_date) {
      return Ok((dt, false));
    }
    match self.fallback {
      // Stored timestamps carry microseconds.
      DateFallback::Now => Ok((Utc::now().trunc_subsecs(6), true)),
      DateFallback::Reject => Err(Error::UnparseableDate {
        row:   row_number,
        value: cell.unwrap_or_default().to_owned(),
      }),
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  const HEADER: &str = "index,Order ID,Date,Status,Fulfilment,Sales Channel ,\
ship-service-level,Style,SKU,Category,Size,ASIN,Courier Status,Qty,currency,\
Amount,ship-city,ship-state,ship-postal-code,ship-country,promotion-ids,B2B,\
fulfilled-by";

  fn csv_with(rows: &[&str]) -> String {
    let mut s = String::from(HEADER);
    for r in rows {
      s.push('\n');
      s.push_str(r);
    }
    s
  }

  fn transform(rows: &[&str]) -> Transformed {
    Transformer::default()
      .transform_reader(csv_with(rows).as_bytes())
      .unwrap()
  }

  const SHIPPED: &str = "1,171-9198151-1101146,04-30-22,Shipped - Delivered to \
Buyer,Merchant,Amazon.in,Standard,JNE3781,JNE3781-KR-XXXL,kurta,3XL,B09K3WFS32,\
Shipped,1,INR,406.0,BENGALURU,KARNATAKA,560085.0,IN,\"Amazon PLCC Free-Financing \
Universal Merchant AAT-XXXXXXXX, IN Core Free Shipping 2015/04/08 23-48-5-108 ,\
\",False,Easy Ship";

  // ── Full row ─────────────────────────────────────────────────────────────

  #[test]
  fn full_row_maps_every_field() {
    let out = transform(&[SHIPPED]);
    assert_eq!(out.orders.len(), 1);
    assert_eq!(out.date_fallbacks, 0);

    let o = &out.orders[0];
    assert_eq!(o.order_id, "171-9198151-1101146");
    assert_eq!(o.date, Utc.with_ymd_and_hms(2022, 4, 30, 0, 0, 0).unwrap());
    assert_eq!(o.status, "Shipped - Delivered to Buyer");
    assert_eq!(o.customer.city, "BENGALURU");
    assert_eq!(o.customer.postal_code, "560085.0");
    assert_eq!(o.region, o.customer);
    assert_eq!(o.product.sku, "JNE3781-KR-XXXL");
    assert_eq!(o.product.category, "kurta");
    assert_eq!(o.sales.channel, "Amazon.in");
    assert_eq!(o.sales.service_level, "Standard");
    assert_eq!(o.sales.quantity, 1);
    assert_eq!(o.sales.amount, 406.0);
    assert!(!o.sales.b2b);
    assert_eq!(o.fulfillment.fulfilled_by, "Easy Ship");
    assert_eq!(o.fulfillment.courier_status, "Shipped");
    assert_eq!(
      o.promotions,
      vec![
        "Amazon PLCC Free-Financing Universal Merchant AAT-XXXXXXXX",
        "IN Core Free Shipping 2015/04/08 23-48-5-108",
      ]
    );
  }

  #[test]
  fn row_order_is_preserved() {
    let out = transform(&[
      "0,A-1,04-01-22,Shipped,,,,,,,,,,1,INR,10,,,,,,,",
      "1,A-2,04-02-22,Shipped,,,,,,,,,,1,INR,20,,,,,,,",
      "2,A-3,04-03-22,Shipped,,,,,,,,,,1,INR,30,,,,,,,",
    ]);
    let ids: Vec<_> = out.orders.iter().map(|o| o.order_id.as_str()).collect();
    assert_eq!(ids, ["A-1", "A-2", "A-3"]);
  }

  // ── Defaults ─────────────────────────────────────────────────────────────

  #[test]
  fn empty_cells_take_type_defaults() {
    let out = transform(&["0,,04-30-22,,,,,,,,,,,,,,,,,,,,"]);
    let o = &out.orders[0];
    assert_eq!(o.order_id, "");
    assert_eq!(o.status, "");
    assert_eq!(o.customer.state, "");
    assert_eq!(o.sales.quantity, 0);
    assert_eq!(o.sales.amount, 0.0);
    assert!(!o.sales.b2b);
    assert!(o.promotions.is_empty());
  }

  #[test]
  fn absent_columns_take_type_defaults() {
    let out = Transformer::default()
      .transform_reader("Order ID,Date\nX-1,2022-04-05\n".as_bytes())
      .unwrap();
    let o = &out.orders[0];
    assert_eq!(o.order_id, "X-1");
    assert_eq!(o.sales.quantity, 0);
    assert_eq!(o.sales.amount, 0.0);
    assert_eq!(o.sales.channel, "");
    assert!(o.promotions.is_empty());
  }

  #[test]
  fn non_numeric_quantity_and_amount_become_zero() {
    let out = transform(&[
      "0,A,04-30-22,S,,,,,,,,,,two,INR,NaN,,,,,,,",
      "1,B,04-30-22,S,,,,,,,,,,inf,INR,abc,,,,,,,",
    ]);
    for o in &out.orders {
      assert_eq!(o.sales.quantity, 0);
      assert_eq!(o.sales.amount, 0.0);
    }
  }

  #[test]
  fn decimal_quantity_truncates_and_negatives_clamp() {
    let out = transform(&["0,A,04-30-22,S,,,,,,,,,,2.0,INR,-5,,,,,,,"]);
    assert_eq!(out.orders[0].sales.quantity, 2);
    assert_eq!(out.orders[0].sales.amount, 0.0);
  }

  // ── B2B flag ─────────────────────────────────────────────────────────────

  #[test]
  fn b2b_only_true_for_true_token() {
    let cases = [
      ("TRUE", true),
      ("True", true),
      ("true", true),
      ("FALSE", false),
      ("False", false),
      ("yes", false),
      ("1", false),
      ("", false),
    ];
    for (cell, expected) in cases {
      let row = format!("0,A,04-30-22,S,,,,,,,,,,1,INR,1,,,,,,{cell},");
      let out = transform(&[row.as_str()]);
      assert_eq!(out.orders[0].sales.b2b, expected, "cell {cell:?}");
    }
  }

  // ── Promotions ───────────────────────────────────────────────────────────

  #[test]
  fn promotions_split_trim_and_drop_empties() {
    assert_eq!(split_list("P1, P2 ,,P3"), vec!["P1", "P2", "P3"]);
    assert!(split_list("").is_empty());
    assert!(split_list(" , ,").is_empty());
  }

  #[test]
  fn blank_promotions_cell_is_empty_list() {
    let out = transform(&["0,A,04-30-22,S,,,,,,,,,,1,INR,1,,,,,\"  \",,"]);
    assert!(out.orders[0].promotions.is_empty());
  }

  // ── Dates ────────────────────────────────────────────────────────────────

  #[test]
  fn parseable_date_is_used_verbatim() {
    let out = transform(&["0,A,2022-04-15 10:30:00,S,,,,,,,,,,1,INR,1,,,,,,,"]);
    assert_eq!(
      out.orders[0].date,
      Utc.with_ymd_and_hms(2022, 4, 15, 10, 30, 0).unwrap()
    );
  }

  /// Documents the substitution: an unreadable date becomes "now" and is
  /// counted rather than rejected.
  #[test]
  fn unparseable_date_falls_back_to_now_and_is_counted() {
    let before = Utc::now().trunc_subsecs(6);
    let out = transform(&[
      "0,A,not a date,S,,,,,,,,,,1,INR,1,,,,,,,",
      "1,B,,S,,,,,,,,,,1,INR,1,,,,,,,",
      "2,C,04-30-22,S,,,,,,,,,,1,INR,1,,,,,,,",
    ]);
    let after = Utc::now();

    assert_eq!(out.date_fallbacks, 2);
    for o in &out.orders[..2] {
      assert!(o.date >= before && o.date <= after, "{} not in window", o.date);
    }
  }

  #[test]
  fn fallback_date_survives_timestamp_round_trip() {
    let out = transform(&["0,A,not a date,S,,,,,,,,,,1,INR,1,,,,,,,"]);
    let date = out.orders[0].date;

    assert_eq!(date.timestamp_subsec_nanos() % 1_000, 0);
    let stored = sales_core::timestamp::format(date);
    assert_eq!(sales_core::timestamp::parse(&stored), Some(date));
  }

  #[test]
  fn reject_policy_fails_on_unparseable_date() {
    let err = Transformer::new(DateFallback::Reject)
      .transform_reader(csv_with(&["0,A,garbage,S,,,,,,,,,,1,INR,1,,,,,,,"]).as_bytes())
      .unwrap_err();
    let Error::UnparseableDate { row, value } = &err else {
      panic!("expected UnparseableDate, got {err:?}")
    };
    assert_eq!(*row, 1);
    assert_eq!(value, "garbage");
  }

  #[test]
  fn fallback_parses_from_str() {
    assert_eq!("NOW".parse::<DateFallback>(), Ok(DateFallback::Now));
    assert_eq!("reject".parse::<DateFallback>(), Ok(DateFallback::Reject));
    assert!("later".parse::<DateFallback>().is_err());
  }
}
