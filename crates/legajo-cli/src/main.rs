//! `legajo`: client registry for a small legal office.
//!
//! # Usage
//!
//! ```
//! legajo add --first-name Ana --last-name Gomez --email ana@x.com \
//!   --phone 1122334455 --age 30 --case-type divorcio
//! legajo show --email ana@x.com
//! legajo list --secret 1234 --adults
//! legajo backup --secret 1234
//! legajo shell
//! ```

mod cli;
mod commands;
mod settings;
mod shell;

use std::io;

use anyhow::Context as _;
use clap::Parser;
use cli::{Cli, Command};
use commands::Context;
use legajo_core::{admin::AdminGate, session::SessionLog};
use legajo_store_sqlite::SqliteStore;
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;

  let store = SqliteStore::open(&settings.store_path).with_context(|| {
    format!("failed to open client store at {}", settings.store_path.display())
  })?;
  tracing::info!(path = %settings.store_path.display(), "client store ready");

  let ctx = Context {
    store,
    gate: AdminGate::new(settings.admin_secret.clone()),
    backup_path: settings.backup_path(),
    json: cli.json,
  };

  let mut log = SessionLog::new();
  let mut out = io::stdout().lock();
  match cli.command {
    Command::Shell => shell::run(&ctx, &mut log, io::stdin().lock(), &mut out),
    command => commands::run(command, &ctx, &mut log, &mut out),
  }
}
