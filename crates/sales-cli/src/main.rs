//! `sales` — load the Amazon sales report into a document store and query it.
//!
//! Reads `sales.toml` (or the path given with `--config`), opens the SQLite
//! document store, and runs one subcommand against it. With no subcommand the
//! full demonstration sequence runs without inserting anything:
//!
//! ```text
//! cargo run -p sales-cli -- run --insert
//! cargo run -p sales-cli -- report region-category
//! cargo run -p sales-cli -- range 2022-04-01 2022-04-30
//! ```

mod commands;
mod config;
mod report;

use std::{path::PathBuf, process::ExitCode};

use anyhow::Context as _;
use clap::Parser;
use sales_core::SalesGateway;
use sales_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::{commands::Command, config::SalesConfig};

#[derive(Parser)]
#[command(author, version, about = "Amazon sales report loader and query tool")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, env = "SALES_CONFIG", default_value = "sales.toml")]
  config: PathBuf,

  /// SQLite store file (overrides `store_path`).
  #[arg(long, env = "SALES_STORE", value_name = "FILE")]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[tokio::main]
async fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let (cfg, gateway, command) = match open(Cli::parse()).await {
    Ok(opened) => opened,
    Err(e) => {
      tracing::error!("{e:?}");
      return ExitCode::FAILURE;
    }
  };

  // The store is released whether or not the command succeeded.
  let result = commands::dispatch(&gateway, &cfg, command).await;
  match gateway.close_after(result).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(_) => ExitCode::FAILURE,
  }
}

/// Load configuration and open the store named by it.
async fn open(cli: Cli) -> anyhow::Result<(SalesConfig, SalesGateway<SqliteStore>, Command)> {
  let mut cfg = SalesConfig::load(&cli.config)?;
  if let Some(store) = cli.store {
    cfg.store_path = config::expand_tilde(&store);
  }

  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {}", cfg.store_path.display()))?;
  tracing::info!("opened store at {}", cfg.store_path.display());

  let command = cli.command.unwrap_or(Command::Run {
    csv:           None,
    insert:        false,
    delete:        false,
    date_fallback: None,
  });

  Ok((cfg, SalesGateway::new(store), command))
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;

  use super::*;

  #[test]
  fn cli_definition_is_consistent() { Cli::command().debug_assert(); }

  #[test]
  fn config_and_store_read_environment() {
    let cmd = Cli::command();
    let env_of = |id: &str| {
      cmd
        .get_arguments()
        .find(|a| a.get_id() == id)
        .and_then(|a| a.get_env())
        .map(|e| e.to_string_lossy().into_owned())
    };
    assert_eq!(env_of("config").as_deref(), Some("SALES_CONFIG"));
    assert_eq!(env_of("store").as_deref(), Some("SALES_STORE"));
  }

  #[test]
  fn subcommand_is_optional() {
    let cli = Cli::try_parse_from(["sales", "--store", "x.db"]).unwrap();
    assert!(cli.command.is_none());
    assert_eq!(cli.store, Some(PathBuf::from("x.db")));
  }
}
