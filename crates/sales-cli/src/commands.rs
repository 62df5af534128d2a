//! Subcommand implementations.
//!
//! Each command is a straight sequence of gateway calls. Any error aborts the
//! command and propagates to `main`, which still closes the store.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Subcommand, ValueEnum};
use sales_core::{
  SalesGateway,
  index::{default_indexes, provision_indexes},
};
use sales_csv::{DateFallback, Transformed, Transformer};
use sales_store_sqlite::SqliteStore;

use crate::{config::SalesConfig, report};

/// Status written by the demonstration run.
const DEMO_STATUS: &str = "Updated Status";

type Gateway = SalesGateway<SqliteStore>;

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Create the default indexes and list every index on the collection.
  Indexes,

  /// Transform the CSV, then walk through every read, report and write.
  Run {
    /// Sales report CSV (overrides `csv_path`).
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Insert the transformed documents before querying.
    #[arg(long)]
    insert: bool,

    /// Delete the sample order after updating it.
    #[arg(long)]
    delete: bool,

    /// What to do with unparseable dates: `now` or `reject`.
    #[arg(long, value_name = "POLICY")]
    date_fallback: Option<DateFallback>,
  },

  /// Transform the CSV and insert every row.
  Import {
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    #[arg(long, value_name = "N")]
    batch_size: Option<usize>,

    #[arg(long, value_name = "POLICY")]
    date_fallback: Option<DateFallback>,
  },

  /// Print the first orders in the store.
  Read {
    #[arg(short, long, default_value_t = 10)]
    limit: usize,
  },

  /// Orders whose date falls in [START, END], with totals.
  Range {
    start: Option<String>,
    end:   Option<String>,
  },

  /// Print one of the aggregation reports.
  Report {
    #[arg(value_enum)]
    kind: ReportKind,
  },

  /// Overwrite the status of the first order with ORDER_ID.
  SetStatus { order_id: String, status: String },

  /// Delete the first order with ORDER_ID.
  Delete { order_id: String },

  /// Document count, status histogram and date bounds.
  Stats,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ReportKind {
  Region,
  Category,
  RegionCategory,
}

pub async fn dispatch(gateway: &Gateway, cfg: &SalesConfig, command: Command) -> Result<()> {
  match command {
    Command::Indexes => indexes(gateway).await,
    Command::Run { csv, insert, delete, date_fallback } => {
      let transformed = transform(cfg, csv, date_fallback)?;
      run(gateway, cfg, transformed, insert, delete).await
    }
    Command::Import { csv, batch_size, date_fallback } => {
      let transformed = transform(cfg, csv, date_fallback)?;
      import(gateway, &transformed, batch_size.unwrap_or(cfg.batch_size)).await
    }
    Command::Read { limit } => {
      let orders = gateway.read(limit).await?;
      report::orders(&orders, orders.len());
      Ok(())
    }
    Command::Range { start, end } => {
      let start = start.as_deref().unwrap_or(&cfg.range_start);
      let end = end.as_deref().unwrap_or(&cfg.range_end);
      report::date_range(&gateway.query_by_date_range(start, end).await?);
      Ok(())
    }
    Command::Report { kind } => aggregate(gateway, kind).await,
    Command::SetStatus { order_id, status } => {
      let outcome = gateway.update_status(&order_id, &status).await?;
      report::update(&order_id, &status, &outcome);
      Ok(())
    }
    Command::Delete { order_id } => {
      let outcome = gateway.delete(&order_id).await?;
      report::delete(&order_id, &outcome);
      Ok(())
    }
    Command::Stats => {
      report::stats(&gateway.stats().await?);
      Ok(())
    }
  }
}

fn transform(
  cfg: &SalesConfig,
  csv: Option<PathBuf>,
  date_fallback: Option<DateFallback>,
) -> Result<Transformed> {
  let path = csv.unwrap_or_else(|| cfg.csv_path.clone());
  Transformer::new(date_fallback.unwrap_or(cfg.date_fallback))
    .transform_path(&path)
    .with_context(|| format!("failed to transform {}", path.display()))
}

async fn indexes(gateway: &Gateway) -> Result<()> {
  let report = provision_indexes(gateway.store(), &default_indexes())
    .await
    .context("failed to list indexes")?;
  report::indexes(&report);
  Ok(())
}

async fn import(gateway: &Gateway, transformed: &Transformed, batch_size: usize) -> Result<()> {
  let summary = gateway.insert(&transformed.orders, batch_size).await?;
  report::import(&summary, transformed.date_fallbacks);
  Ok(())
}

async fn aggregate(gateway: &Gateway, kind: ReportKind) -> Result<()> {
  match kind {
    ReportKind::Region => report::region(&gateway.aggregate_by_region().await?),
    ReportKind::Category => report::category(&gateway.aggregate_by_category().await?),
    ReportKind::RegionCategory => {
      report::region_category(&gateway.aggregate_by_region_and_category().await?)
    }
  }
  Ok(())
}

/// The full demonstration sequence.
async fn run(
  gateway: &Gateway,
  cfg: &SalesConfig,
  transformed: Transformed,
  insert: bool,
  delete: bool,
) -> Result<()> {
  if insert {
    import(gateway, &transformed, cfg.batch_size).await?;
  } else {
    tracing::info!(
      "skipping insert of {} documents (pass --insert to load them)",
      transformed.orders.len()
    );
  }

  let orders = gateway.read(5).await?;
  report::orders(&orders, 3);

  report::date_range(&gateway.query_by_date_range(&cfg.range_start, &cfg.range_end).await?);

  aggregate(gateway, ReportKind::Region).await?;
  aggregate(gateway, ReportKind::Category).await?;
  aggregate(gateway, ReportKind::RegionCategory).await?;

  match gateway.read(1).await?.into_iter().next() {
    Some(sample) => {
      let outcome = gateway.update_status(&sample.order_id, DEMO_STATUS).await?;
      report::update(&sample.order_id, DEMO_STATUS, &outcome);

      if delete {
        let outcome = gateway.delete(&sample.order_id).await?;
        report::delete(&sample.order_id, &outcome);
      }
    }
    None => tracing::warn!("store is empty; skipping update and delete"),
  }

  report::stats(&gateway.stats().await?);
  Ok(())
}
