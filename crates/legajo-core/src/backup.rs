//! Plain-text backup of every client record.
//!
//! The snapshot is rendered in memory, written to a sibling temp file, synced,
//! and renamed over the previous backup. A failed write leaves the old backup
//! in place.

use std::{
  ffi::OsString,
  fs::{self, File},
  io::{self, Write as _},
  path::{Path, PathBuf},
};

use chrono::{Local, NaiveDateTime};
use thiserror::Error;

use crate::{
  client::{Client, DISPLAY_TIMESTAMP_FORMAT},
  store::ClientStore,
};

/// File name used when the backup is written next to the database.
pub const BACKUP_FILE_NAME: &str = "respaldo_clientes.txt";

pub const REPORT_TITLE: &str = "Reporte de Clientes - Estudio Jurídico";

const HEADER_RULE_WIDTH: usize = 55;
const RECORD_RULE_WIDTH: usize = 40;
const MISSING: &str = "N/A";

// ─── Types ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
  /// The store holds no clients; nothing was written and any existing backup
  /// was left alone.
  Empty,
  Written { path: PathBuf, records: usize },
}

#[derive(Debug, Error)]
pub enum BackupError {
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("failed to write backup to {}: {source}", path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },
}

// ─── Export ──────────────────────────────────────────────────────────────────

/// Snapshot every client in `store` to `path`, stamped with the current local
/// time.
pub fn export<S: ClientStore>(
  store: &S,
  path: impl AsRef<Path>,
) -> Result<BackupOutcome, BackupError> {
  export_at(store, path, Local::now().naive_local())
}

/// As [`export`], with an explicit generation timestamp.
pub fn export_at<S: ClientStore>(
  store: &S,
  path: impl AsRef<Path>,
  generated_at: NaiveDateTime,
) -> Result<BackupOutcome, BackupError> {
  let path = path.as_ref();

  let clients = store
    .list_all()
    .map_err(|e| BackupError::Store(Box::new(e)))?;

  if clients.is_empty() {
    tracing::warn!("no clients to back up; leaving {} untouched", path.display());
    return Ok(BackupOutcome::Empty);
  }

  let contents = render(&clients, generated_at);
  write_atomic(path, contents.as_bytes()).map_err(|source| {
    tracing::error!(path = %path.display(), %source, "backup write failed");
    BackupError::Io { path: path.to_path_buf(), source }
  })?;

  tracing::info!(path = %path.display(), records = clients.len(), "backup written");
  Ok(BackupOutcome::Written {
    path:    path.to_path_buf(),
    records: clients.len(),
  })
}

/// Render the backup text. Output depends only on the arguments.
pub fn render(clients: &[Client], generated_at: NaiveDateTime) -> String {
  let mut out = String::new();

  out.push_str(&format!("{REPORT_TITLE}\n"));
  out.push_str(&format!(
    "Fecha de Creación: {}\n",
    generated_at.format(DISPLAY_TIMESTAMP_FORMAT)
  ));
  out.push_str(&format!("{}\n", "-".repeat(HEADER_RULE_WIDTH)));
  out.push('\n');

  for c in clients {
    let age = c.age.map_or_else(|| MISSING.to_owned(), |a| a.to_string());
    let registered =
      c.registered_at_display().unwrap_or_else(|| MISSING.to_owned());

    out.push_str(&format!("ID: {}\n", c.id));
    out.push_str(&format!("Nombre Completo: {}\n", c.full_name()));
    out.push_str(&format!("Edad: {age}\n"));
    out.push_str(&format!("Email: {}\n", c.email));
    out.push_str(&format!("Teléfono: {}\n", c.phone));
    out.push_str(&format!("Fuero: {}\n", c.category));
    out.push_str(&format!("Tipo de caso: {}\n", c.case_type));
    out.push_str(&format!("Fecha de registro: {registered}\n"));
    out.push_str(&format!("{}\n", "-".repeat(RECORD_RULE_WIDTH)));
  }

  out
}

/// Write `contents` to `<path>.tmp`, sync it, then rename it over `path`.
fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
  let mut tmp_name = OsString::from(path.as_os_str());
  tmp_name.push(".tmp");
  let tmp_path = PathBuf::from(tmp_name);

  let written = File::create(&tmp_path).and_then(|mut file| {
    file.write_all(contents)?;
    file.flush()?;
    file.sync_all()
  });

  if let Err(e) = written.and_then(|()| fs::rename(&tmp_path, path)) {
    let _ = fs::remove_file(&tmp_path);
    return Err(e);
  }
  Ok(())
}
