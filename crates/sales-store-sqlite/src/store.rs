//! [`SqliteStore`] — the SQLite implementation of [`SalesStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;

use sales_core::{
  index::{IndexInfo, IndexSpec},
  order::OrderDocument,
  report::{
    CategorySales, DateBounds, DeleteOutcome, RegionCategorySales, RegionSales,
    StatusCount, UpdateOutcome,
  },
  store::SalesStore,
};

use crate::{
  Result,
  encode::{RawIndex, decode_doc, decode_dt, encode_doc, encode_dt, field_expr, quote_ident},
  schema::SCHEMA,
};

// ─── Field expressions ───────────────────────────────────────────────────────
//
// Spelled exactly as `field_expr` builds them so the planner can match
// queries against expression indexes.

const ORDER_ID: &str = "json_extract(doc, '$.order_id')";
const DATE: &str = "json_extract(doc, '$.date')";
const STATUS: &str = "json_extract(doc, '$.status')";
const STATE: &str = "json_extract(doc, '$.region.state')";
const CATEGORY: &str = "json_extract(doc, '$.product.category')";
const SKU: &str = "json_extract(doc, '$.product.sku')";
const AMOUNT: &str = "json_extract(doc, '$.sales.amount')";
const QUANTITY: &str = "json_extract(doc, '$.sales.quantity')";

/// `LIMIT -1` means unbounded in SQLite.
fn sql_limit(limit: Option<usize>) -> i64 {
  limit.map_or(-1, |n| i64::try_from(n).unwrap_or(i64::MAX))
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An order-document store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::debug!("opened sales store at {}", path.display());
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a query whose single column is a document body, and decode it.
  async fn query_docs(
    &self,
    sql: String,
    params: Vec<rusqlite::types::Value>,
  ) -> Result<Vec<OrderDocument>> {
    let raws: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;

    raws.iter().map(|s| decode_doc(s)).collect()
  }
}

// ─── SalesStore impl ─────────────────────────────────────────────────────────

impl SalesStore for SqliteStore {
  type Error = crate::Error;

  // ── Indexes ───────────────────────────────────────────────────────────────

  async fn create_index(&self, spec: &IndexSpec) -> Result<String> {
    let expr = field_expr(&spec.field)?;
    let name = spec.name();
    let order = spec.direction.label();
    let ddl = format!(
      "CREATE INDEX IF NOT EXISTS {} ON orders ({expr} {order})",
      quote_ident(&name)
    );

    let name_str  = name.clone();
    let field     = spec.field.clone();
    let direction = spec.direction.as_i32();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(&ddl, [])?;
        tx.execute(
          "INSERT OR IGNORE INTO order_indexes (name, field, direction) VALUES (?1, ?2, ?3)",
          rusqlite::params![name_str, field, direction],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(name)
  }

  async fn list_indexes(&self) -> Result<Vec<IndexInfo>> {
    let raws: Vec<RawIndex> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT i.name, i.field, i.direction
           FROM order_indexes i
           JOIN sqlite_master m ON m.type = 'index' AND m.name = i.name
           WHERE m.tbl_name = 'orders'
           ORDER BY i.rowid",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawIndex {
              name:      row.get(0)?,
              field:     row.get(1)?,
              direction: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawIndex::into_info).collect()
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn insert_many(&self, orders: &[OrderDocument]) -> Result<u64> {
    let docs = orders.iter().map(encode_doc).collect::<Result<Vec<_>>>()?;

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut inserted = 0u64;
        {
          let mut stmt = tx.prepare("INSERT INTO orders (doc) VALUES (json(?1))")?;
          for doc in &docs {
            inserted += stmt.execute(rusqlite::params![doc])? as u64;
          }
        }
        tx.commit()?;
        Ok(inserted)
      })
      .await?;

    Ok(inserted)
  }

  async fn update_status(&self, order_id: &str, status: &str) -> Result<UpdateOutcome> {
    let order_id = order_id.to_owned();
    let status   = status.to_owned();

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let found: Option<(i64, Option<String>)> = tx
          .query_row(
            &format!("SELECT id, {STATUS} FROM orders WHERE {ORDER_ID} = ?1 ORDER BY id LIMIT 1"),
            rusqlite::params![order_id],
            |r| Ok((r.get(0)?, r.get(1)?)),
          )
          .optional()?;

        let outcome = match found {
          None => UpdateOutcome { matched: 0, modified: 0 },
          Some((_, Some(current))) if current == status => {
            UpdateOutcome { matched: 1, modified: 0 }
          }
          Some((id, _)) => {
            tx.execute(
              "UPDATE orders SET doc = json_set(doc, '$.status', ?1) WHERE id = ?2",
              rusqlite::params![status, id],
            )?;
            UpdateOutcome { matched: 1, modified: 1 }
          }
        };
        tx.commit()?;
        Ok(outcome)
      })
      .await?;

    Ok(outcome)
  }

  async fn delete_one(&self, order_id: &str) -> Result<DeleteOutcome> {
    let order_id = order_id.to_owned();

    let deleted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          &format!(
            "DELETE FROM orders WHERE id = (
               SELECT id FROM orders WHERE {ORDER_ID} = ?1 ORDER BY id LIMIT 1
             )"
          ),
          rusqlite::params![order_id],
        )?;
        Ok(n as u64)
      })
      .await?;

    Ok(DeleteOutcome { deleted })
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn find(&self, limit: Option<usize>) -> Result<Vec<OrderDocument>> {
    self
      .query_docs(
        "SELECT doc FROM orders ORDER BY id LIMIT ?1".to_owned(),
        vec![sql_limit(limit).into()],
      )
      .await
  }

  async fn find_by_date_range(
    &self,
    start: DateTime<Utc>,
    end:   DateTime<Utc>,
  ) -> Result<Vec<OrderDocument>> {
    self
      .query_docs(
        format!("SELECT doc FROM orders WHERE {DATE} BETWEEN ?1 AND ?2 ORDER BY id"),
        vec![encode_dt(start).into(), encode_dt(end).into()],
      )
      .await
  }

  // ── Aggregations ──────────────────────────────────────────────────────────

  async fn aggregate_by_region(&self, limit: Option<usize>) -> Result<Vec<RegionSales>> {
    let limit = sql_limit(limit);

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT IFNULL({STATE}, '') AS state,
                  TOTAL({AMOUNT})     AS total_sales,
                  COUNT(*)            AS order_count,
                  IFNULL(SUM({QUANTITY}), 0),
                  AVG({AMOUNT})
           FROM orders
           WHERE {AMOUNT} > 0
           GROUP BY state
           ORDER BY total_sales DESC, state ASC
           LIMIT ?1"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit], |row| {
            Ok(RegionSales {
              state:           row.get(0)?,
              total_sales:     row.get(1)?,
              order_count:     row.get::<_, i64>(2)? as u64,
              total_quantity:  row.get(3)?,
              avg_order_value: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows)
  }

  async fn aggregate_by_category(&self, limit: Option<usize>) -> Result<Vec<CategorySales>> {
    let limit = sql_limit(limit);

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT IFNULL({CATEGORY}, '') AS category,
                  TOTAL({AMOUNT})        AS total_sales,
                  COUNT(*)               AS order_count,
                  IFNULL(SUM({QUANTITY}), 0),
                  AVG({AMOUNT}),
                  COUNT(DISTINCT {SKU})
           FROM orders
           WHERE {AMOUNT} > 0
           GROUP BY category
           ORDER BY total_sales DESC, category ASC
           LIMIT ?1"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit], |row| {
            Ok(CategorySales {
              category:             row.get(0)?,
              total_sales:          row.get(1)?,
              order_count:          row.get::<_, i64>(2)? as u64,
              total_quantity:       row.get(3)?,
              avg_order_value:      row.get(4)?,
              unique_product_count: row.get::<_, i64>(5)? as u64,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows)
  }

  async fn aggregate_by_region_and_category(
    &self,
    limit: Option<usize>,
  ) -> Result<Vec<RegionCategorySales>> {
    let limit = sql_limit(limit);

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT IFNULL({STATE}, '')    AS state,
                  IFNULL({CATEGORY}, '') AS category,
                  TOTAL({AMOUNT})        AS total_sales,
                  COUNT(*)
           FROM orders
           WHERE {AMOUNT} > 0
           GROUP BY state, category
           ORDER BY total_sales DESC, state ASC, category ASC
           LIMIT ?1"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit], |row| {
            Ok(RegionCategorySales {
              state:       row.get(0)?,
              category:    row.get(1)?,
              total_sales: row.get(2)?,
              order_count: row.get::<_, i64>(3)? as u64,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows)
  }

  // ── Statistics ────────────────────────────────────────────────────────────

  async fn count(&self) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM orders", [], |r| r.get(0))?))
      .await?;
    Ok(n as u64)
  }

  async fn status_counts(&self) -> Result<Vec<StatusCount>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT IFNULL({STATUS}, '') AS status, COUNT(*) AS n
           FROM orders
           GROUP BY status
           ORDER BY n DESC, status ASC"
        ))?;
        let rows = stmt
          .query_map([], |row| {
            Ok(StatusCount {
              status: row.get(0)?,
              count:  row.get::<_, i64>(1)? as u64,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows)
  }

  async fn date_bounds(&self) -> Result<Option<DateBounds>> {
    let (min, max): (Option<String>, Option<String>) = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          &format!("SELECT MIN({DATE}), MAX({DATE}) FROM orders"),
          [],
          |r| Ok((r.get(0)?, r.get(1)?)),
        )?)
      })
      .await?;

    match (min, max) {
      (Some(min), Some(max)) => Ok(Some(DateBounds {
        min: decode_dt(&min)?,
        max: decode_dt(&max)?,
      })),
      _ => Ok(None),
    }
  }

  // ── Lifecycle ─────────────────────────────────────────────────────────────

  async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }
}
