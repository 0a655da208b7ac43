//! Runtime settings: an optional TOML file overlaid by `LEGAJO_*` environment
//! variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use legajo_core::backup::BACKUP_FILE_NAME;
use serde::Deserialize;

/// Secret the original deployment shipped with. Using it is allowed but
/// logged.
pub const DEFAULT_ADMIN_SECRET: &str = "1234";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// SQLite database file.
  #[serde(default = "default_store_path")]
  pub store_path:   PathBuf,
  /// Backup file; defaults to `respaldo_clientes.txt` next to the database.
  #[serde(default)]
  pub backup_path:  Option<PathBuf>,
  /// Shared secret for listing every client and for backups.
  #[serde(default = "default_admin_secret")]
  pub admin_secret: String,
}

fn default_store_path() -> PathBuf { PathBuf::from("clientes.db") }

fn default_admin_secret() -> String { DEFAULT_ADMIN_SECRET.to_owned() }

impl Settings {
  /// Read `file` (if it exists) and then the environment.
  pub fn load(file: &Path) -> anyhow::Result<Self> {
    let raw = config::Config::builder()
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("LEGAJO"))
      .build()
      .with_context(|| format!("failed to read config file {}", file.display()))?;

    let mut settings: Settings = raw
      .try_deserialize()
      .context("failed to deserialise Settings")?;

    settings.store_path = expand_tilde(&settings.store_path);
    settings.backup_path = settings.backup_path.as_deref().map(expand_tilde);

    if settings.admin_secret == DEFAULT_ADMIN_SECRET {
      tracing::warn!("using the default admin secret; set LEGAJO_ADMIN_SECRET");
    }
    Ok(settings)
  }

  /// Where backups are written.
  pub fn backup_path(&self) -> PathBuf {
    match &self.backup_path {
      Some(p) => p.clone(),
      None => self.store_path.with_file_name(BACKUP_FILE_NAME),
    }
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
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
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn missing_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let settings = Settings::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(settings.store_path, PathBuf::from("clientes.db"));
    assert_eq!(settings.backup_path(), PathBuf::from(BACKUP_FILE_NAME));
  }

  #[test]
  fn file_values_are_used() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("legajo.toml");
    std::fs::write(
      &file,
      "store_path = \"/srv/legajo/clientes.db\"\nadmin_secret = \"s3cret\"\n",
    )
    .unwrap();

    let settings = Settings::load(&file).unwrap();
    assert_eq!(settings.admin_secret, "s3cret");
    assert_eq!(
      settings.backup_path(),
      PathBuf::from("/srv/legajo/respaldo_clientes.txt")
    );
  }

  #[test]
  fn explicit_backup_path_wins() {
    let settings = Settings {
      store_path:   PathBuf::from("data/clientes.db"),
      backup_path:  Some(PathBuf::from("/backups/legajo.txt")),
      admin_secret: "x".into(),
    };
    assert_eq!(settings.backup_path(), PathBuf::from("/backups/legajo.txt"));
  }

  #[test]
  fn tilde_is_expanded() {
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(
        expand_tilde(Path::new("~/clientes.db")),
        PathBuf::from(home).join("clientes.db")
      );
    }
    assert_eq!(expand_tilde(Path::new("/abs.db")), PathBuf::from("/abs.db"));
  }
}
