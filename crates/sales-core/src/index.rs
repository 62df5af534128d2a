//! Index specifications and the index provisioner.
//!
//! Each index is requested independently. A failure is logged and recorded
//! in the [`ProvisionReport`]; it never stops the remaining requests, and
//! nothing already created is rolled back.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::store::SalesStore;

// ─── Specs ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
  Ascending,
  Descending,
}

impl SortDirection {
  /// The document-store key value: `1` or `-1`.
  pub fn as_i32(self) -> i32 {
    match self {
      Self::Ascending => 1,
      Self::Descending => -1,
    }
  }

  pub fn from_i32(value: i32) -> Option<Self> {
    match value {
      1 => Some(Self::Ascending),
      -1 => Some(Self::Descending),
      _ => None,
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Ascending => "ASC",
      Self::Descending => "DESC",
    }
  }
}

/// A single-field index request. `field` is a dotted document path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSpec {
  pub field:     String,
  pub direction: SortDirection,
}

impl IndexSpec {
  pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
    Self { field: field.into(), direction }
  }

  /// Conventional name, e.g. `sales.amount_-1`.
  pub fn name(&self) -> String {
    format!("{}_{}", self.field, self.direction.as_i32())
  }
}

impl fmt::Display for IndexSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ({})", self.field, self.direction.label())
  }
}

/// An index as reported by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexInfo {
  pub name:      String,
  pub field:     String,
  pub direction: SortDirection,
}

/// The indexes the sales queries rely on.
pub fn default_indexes() -> Vec<IndexSpec> {
  use SortDirection::*;
  vec![
    IndexSpec::new("date", Ascending),
    IndexSpec::new("region.state", Ascending),
    IndexSpec::new("product.category", Ascending),
    IndexSpec::new("sales.amount", Descending),
    IndexSpec::new("status", Ascending),
    IndexSpec::new("order_id", Ascending),
  ]
}

/// `true` if `path` is a dot-separated list of identifiers
/// (`[A-Za-z_][A-Za-z0-9_]*`).
pub fn is_valid_field_path(path: &str) -> bool {
  !path.is_empty()
    && path.split('.').all(|segment| {
      let mut chars = segment.chars();
      matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    })
}

// ─── Provisioner ─────────────────────────────────────────────────────────────

/// Outcome of [`provision_indexes`].
#[derive(Debug, Clone, Default)]
pub struct ProvisionReport {
  /// Specs the store accepted, in request order.
  pub created: Vec<IndexSpec>,
  /// Specs the store rejected, with the error message.
  pub failed:  Vec<(IndexSpec, String)>,
  /// Everything defined on the collection afterwards.
  pub indexes: Vec<IndexInfo>,
}

/// Request one index per spec, then list what the collection ended up with.
///
/// Per-index failures are tolerated. Only the final listing can fail the
/// whole call.
pub async fn provision_indexes<S: SalesStore>(
  store: &S,
  specs: &[IndexSpec],
) -> Result<ProvisionReport, S::Error> {
  let mut report = ProvisionReport::default();

  for spec in specs {
    match store.create_index(spec).await {
      Ok(name) => {
        tracing::info!(index = %name, "created index on {}", spec.field);
        report.created.push(spec.clone());
      }
      Err(e) => {
        tracing::warn!("error creating index on {}: {e}", spec.field);
        report.failed.push((spec.clone(), e.to_string()));
      }
    }
  }

  report.indexes = store.list_indexes().await?;
  Ok(report)
}
