//! Plain-text report rendering for stdout.

use sales_core::{
  index::ProvisionReport,
  order::OrderDocument,
  report::{
    CategorySales, CollectionStats, DateRangeReport, DeleteOutcome, InsertSummary,
    RegionCategorySales, RegionSales, UpdateOutcome,
  },
};

/// Amounts in the sales report are always rupees.
const CURRENCY: &str = "INR";

// ─── Number formatting ────────────────────────────────────────────────────────

/// Two decimals with comma thousands separators: `1234567.891` →
/// `1,234,567.89`.
pub fn money(value: f64) -> String {
  let fixed = format!("{:.2}", value.abs());
  let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
  let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
  format!("{sign}{}.{frac_part}", group_thousands(int_part))
}

/// Comma-grouped integer: `1234567` → `1,234,567`.
pub fn count(value: u64) -> String { group_thousands(&value.to_string()) }

fn group_thousands(digits: &str) -> String {
  let mut out = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push(',');
    }
    out.push(c);
  }
  out
}

fn rule(width: usize) { println!("{}", "-".repeat(width)); }

fn heading(title: &str) { println!("\n=== {title} ==="); }

// ─── Orders ───────────────────────────────────────────────────────────────────

pub fn import(summary: &InsertSummary, date_fallbacks: usize) {
  heading("INSERT");
  println!(
    "Inserted {} orders in {} batch(es)",
    count(summary.inserted),
    summary.batches
  );
  if date_fallbacks > 0 {
    println!(
      "{} rows had an unparseable date and were stamped with the load time",
      count(date_fallbacks as u64)
    );
  }
}

/// Print the first `show` orders in detail.
pub fn orders(orders: &[OrderDocument], show: usize) {
  heading("READ");
  println!("Found {} orders", orders.len());
  for o in orders.iter().take(show) {
    println!("\nOrder ID: {}", o.order_id);
    println!("  Date: {}", o.date.format("%Y-%m-%d %H:%M:%S"));
    println!("  Customer: {}, {}", o.customer.city, o.customer.state);
    println!("  Product: {} - {}", o.product.category, o.product.style);
    println!("  Amount: {} {}", money(o.sales.amount), o.sales.currency);
  }
}

pub fn date_range(report: &DateRangeReport) {
  heading("QUERY: Orders in Date Range");
  println!(
    "Date Range: {} to {}",
    report.start.format("%Y-%m-%d %H:%M:%S"),
    report.end.format("%Y-%m-%d %H:%M:%S")
  );
  println!("Found {} orders in date range", count(report.orders.len() as u64));
  println!("Total Amount: {}", money(report.total_amount));
  println!("Total Quantity: {}", count(report.total_quantity));

  if !report.orders.is_empty() {
    println!("\nSample orders:");
    for o in report.orders.iter().take(5) {
      println!(
        "  {}: {} - {} {}",
        o.order_id,
        o.date.format("%Y-%m-%d %H:%M:%S"),
        money(o.sales.amount),
        o.sales.currency
      );
    }
  }
}

// ─── Aggregations ─────────────────────────────────────────────────────────────

pub fn region(rows: &[RegionSales]) {
  heading("AGGREGATION: Sales by Region (State)");
  println!("\nTop {} States by Sales:", rows.len());
  println!("{:<25} {:<15} {:<10} {:<15}", "State", "Total Sales", "Orders", "Avg Order Value");
  rule(70);
  for r in rows {
    println!(
      "{:<25} {:>12} {CURRENCY} {:>8} {:>12} {CURRENCY}",
      r.state,
      money(r.total_sales),
      count(r.order_count),
      money(r.avg_order_value)
    );
  }
}

pub fn category(rows: &[CategorySales]) {
  heading("AGGREGATION: Sales by Category");
  println!(
    "\n{:<20} {:<15} {:<10} {:<10} {:<15}",
    "Category", "Total Sales", "Orders", "Products", "Avg Value"
  );
  rule(80);
  for r in rows {
    println!(
      "{:<20} {:>12} {CURRENCY} {:>8} {:>8} {:>12} {CURRENCY}",
      r.category,
      money(r.total_sales),
      count(r.order_count),
      count(r.unique_product_count),
      money(r.avg_order_value)
    );
  }
}

pub fn region_category(rows: &[RegionCategorySales]) {
  heading("AGGREGATION: Sales by Region AND Category");
  println!("\nTop {} State-Category Combinations:", rows.len());
  println!("{:<20} {:<20} {:<15} {:<10}", "State", "Category", "Total Sales", "Orders");
  rule(70);
  for r in rows {
    println!(
      "{:<20} {:<20} {:>12} {CURRENCY} {:>8}",
      r.state,
      r.category,
      money(r.total_sales),
      count(r.order_count)
    );
  }
}

// ─── Writes ───────────────────────────────────────────────────────────────────

pub fn update(order_id: &str, status: &str, outcome: &UpdateOutcome) {
  heading("UPDATE");
  println!("Updating order {order_id} status to {status}");
  if outcome.matched > 0 {
    println!("Successfully updated {} order(s)", outcome.modified);
  } else {
    println!("Order {order_id} not found");
  }
}

pub fn delete(order_id: &str, outcome: &DeleteOutcome) {
  heading("DELETE");
  if outcome.deleted > 0 {
    println!("Successfully deleted order {order_id}");
  } else {
    println!("Order {order_id} not found");
  }
}

// ─── Statistics & indexes ─────────────────────────────────────────────────────

pub fn stats(stats: &CollectionStats) {
  heading("COLLECTION STATISTICS");
  println!("Total Orders: {}", count(stats.total_documents));

  println!("\nOrders by Status:");
  for s in &stats.status_counts {
    println!("  {}: {}", s.status, count(s.count));
  }

  if let Some(range) = &stats.date_range {
    println!("\nDate Range:");
    println!("  From: {}", range.min.format("%Y-%m-%d %H:%M:%S"));
    println!("  To: {}", range.max.format("%Y-%m-%d %H:%M:%S"));
  }
}

pub fn indexes(report: &ProvisionReport) {
  heading("INDEXES");
  for spec in &report.created {
    println!("✓ Created index on: {}", spec.field);
  }
  for (spec, err) in &report.failed {
    println!("✗ Error creating index on {}: {err}", spec.field);
  }

  println!("\n✓ Created {} indexes", report.created.len());
  for spec in &report.created {
    println!("  - {spec}");
  }

  println!("\nAll indexes on collection:");
  for idx in &report.indexes {
    println!("  - {}: {{{}: {}}}", idx.name, idx.field, idx.direction.as_i32());
  }
}
