//! Runtime configuration.
//!
//! Layered lowest to highest: built-in defaults, the optional TOML file,
//! `SALES_*` environment variables. Command-line flags are applied on top by
//! the caller.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use sales_core::gateway::DEFAULT_BATCH_SIZE;
use sales_csv::DateFallback;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SalesConfig {
  /// SQLite file holding the order documents.
  pub store_path:    PathBuf,
  /// Sales report export to transform.
  pub csv_path:      PathBuf,
  pub batch_size:    usize,
  pub date_fallback: DateFallback,
  /// Default bounds for the date-range query.
  pub range_start:   String,
  pub range_end:     String,
}

impl SalesConfig {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("store_path", "sales.db")?
      .set_default("csv_path", "Amazon Sale Report.csv")?
      .set_default("batch_size", DEFAULT_BATCH_SIZE as i64)?
      .set_default("date_fallback", "now")?
      .set_default("range_start", "2022-04-01")?
      .set_default("range_end", "2022-04-30")?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("SALES"))
      .build()
      .context("failed to read config file")?;

    let mut cfg: SalesConfig = settings
      .try_deserialize()
      .context("failed to deserialise SalesConfig")?;

    cfg.store_path = expand_tilde(&cfg.store_path);
    cfg.csv_path = expand_tilde(&cfg.csv_path);
    Ok(cfg)
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_apply_without_a_file() {
    let cfg = SalesConfig::load(Path::new("does-not-exist.toml")).unwrap();
    assert_eq!(cfg.batch_size, DEFAULT_BATCH_SIZE);
    assert_eq!(cfg.date_fallback, DateFallback::Now);
    assert_eq!(cfg.range_start, "2022-04-01");
    assert_eq!(cfg.range_end, "2022-04-30");
  }

  #[test]
  fn tilde_only_expands_at_start() {
    let p = Path::new("data/~/sales.db");
    assert_eq!(expand_tilde(p), p.to_path_buf());
  }
}
