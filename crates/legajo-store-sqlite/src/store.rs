//! [`SqliteStore`], the SQLite implementation of [`ClientStore`].

use std::path::{Path, PathBuf};

use chrono::Local;
use rusqlite::{Connection, OptionalExtension as _, Params};

use legajo_core::{
  case::CaseCategory,
  client::{ADULT_AGE, AgeBracket, Client, ClientInput},
  store::ClientStore,
};

use crate::{
  Error, Result,
  encode::{RawClient, encode_dt, normalize_email},
  schema::{self, COLUMNS},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A client registry backed by a single SQLite file.
///
/// Holds only the file path. Each operation opens a fresh connection, so
/// cloning is cheap and no handle is kept between calls.
#[derive(Debug, Clone)]
pub struct SqliteStore {
  path: PathBuf,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and bring its schema up to date.
  pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
    let store = Self { path: path.into() };
    store.initialize()?;
    Ok(store)
  }

  pub fn path(&self) -> &Path { &self.path }

  /// Run `f` on a connection that is closed again before this returns.
  /// Failures are logged here, at the boundary of each operation.
  fn call<T>(
    &self,
    op: &'static str,
    f: impl FnOnce(&mut Connection) -> Result<T>,
  ) -> Result<T> {
    let result = Connection::open(&self.path)
      .map_err(Error::from)
      .and_then(|mut conn| f(&mut conn));

    match &result {
      Err(Error::DuplicateEmail(email)) => {
        tracing::warn!(op, email = %email, "duplicate email rejected");
      }
      Err(e) => tracing::error!(op, error = %e, "client store operation failed"),
      Ok(_) => {}
    }
    result
  }

  /// Select every client matching `filter` (an SQL `WHERE` body, or empty for
  /// no filter), ordered by id.
  fn select_where<P: Params>(
    &self,
    op: &'static str,
    filter: &str,
    params: P,
  ) -> Result<Vec<Client>> {
    let where_clause = if filter.is_empty() {
      String::new()
    } else {
      format!("WHERE {filter}")
    };
    let sql = format!(
      "SELECT {COLUMNS} FROM {table} {where_clause} ORDER BY ID ASC",
      table = schema::TABLE,
    );

    self.call(op, move |conn| {
      let mut stmt = conn.prepare(&sql)?;
      let raws = stmt
        .query_map(params, RawClient::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
      raws.into_iter().map(RawClient::into_client).collect()
    })
  }

  fn select_one<P: Params>(
    &self,
    op: &'static str,
    filter: &str,
    params: P,
  ) -> Result<Option<Client>> {
    let sql = format!(
      "SELECT {COLUMNS} FROM {table} WHERE {filter}",
      table = schema::TABLE,
    );

    self.call(op, move |conn| {
      let raw = conn
        .query_row(&sql, params, RawClient::from_row)
        .optional()?;
      raw.map(RawClient::into_client).transpose()
    })
  }
}

/// Turn a UNIQUE violation on a write into [`Error::DuplicateEmail`].
fn write_error(e: rusqlite::Error, email: &str) -> Error {
  match e {
    rusqlite::Error::SqliteFailure(ref f, _)
      if f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
    {
      Error::DuplicateEmail(email.to_owned())
    }
    other => Error::Storage(other),
  }
}

// ─── ClientStore impl ────────────────────────────────────────────────────────

impl ClientStore for SqliteStore {
  type Error = Error;

  fn initialize(&self) -> Result<()> {
    self.call("initialize", |conn| {
      let report = schema::migrate(conn)?;
      for row in &report.set_aside {
        tracing::warn!(
          id = row.id,
          email = %row.email,
          kept_id = row.kept_id,
          "email differs only in case from an earlier client; row moved to \
           clientes_email_conflicts"
        );
      }
      tracing::debug!(
        applied = report.applied,
        version = schema::current_version(),
        path = %self.path.display(),
        "schema ready"
      );
      Ok(())
    })
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  fn insert(&self, input: &ClientInput) -> Result<i64> {
    let email = normalize_email(&input.email);
    let registered_at = encode_dt(Local::now().naive_local());

    self.call("insert", |conn| {
      let tx = conn.transaction()?;
      tx.execute(
        "INSERT INTO clientes (
           Nombre, Apellido, Edad, Email, Telefono, Fuero, Tipo_de_caso,
           Fecha_registro
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
          input.first_name,
          input.last_name,
          input.age,
          email,
          input.phone,
          input.category.as_ref(),
          input.case_type.to_string(),
          registered_at,
        ],
      )
      .map_err(|e| write_error(e, &email))?;
      let id = tx.last_insert_rowid();
      tx.commit()?;

      tracing::info!(id, "client inserted");
      Ok(id)
    })
  }

  fn update(&self, id: i64, input: &ClientInput) -> Result<bool> {
    let email = normalize_email(&input.email);

    self.call("update", |conn| {
      let tx = conn.transaction()?;
      let changed = tx
        .execute(
          "UPDATE clientes
           SET Nombre = ?1, Apellido = ?2, Edad = ?3, Email = ?4,
               Telefono = ?5, Fuero = ?6, Tipo_de_caso = ?7
           WHERE ID = ?8",
          rusqlite::params![
            input.first_name,
            input.last_name,
            input.age,
            email,
            input.phone,
            input.category.as_ref(),
            input.case_type.to_string(),
            id,
          ],
        )
        .map_err(|e| write_error(e, &email))?;
      tx.commit()?;

      tracing::debug!(id, changed, "client update");
      Ok(changed > 0)
    })
  }

  fn delete(&self, id: i64) -> Result<bool> {
    self.call("delete", |conn| {
      let removed = conn.execute("DELETE FROM clientes WHERE ID = ?1", [id])?;
      tracing::debug!(id, removed, "client delete");
      Ok(removed > 0)
    })
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  fn get_by_id(&self, id: i64) -> Result<Option<Client>> {
    self.select_one("get_by_id", "ID = ?1", [id])
  }

  fn get_by_email(&self, email: &str) -> Result<Option<Client>> {
    let email = normalize_email(email);
    self.select_one("get_by_email", "Email = ?1 COLLATE NOCASE", [email])
  }

  fn list_all(&self) -> Result<Vec<Client>> {
    self.select_where("list_all", "", rusqlite::params![])
  }

  fn find_by_category(&self, category: CaseCategory) -> Result<Vec<Client>> {
    self.select_where(
      "find_by_category",
      "Fuero = ?1 COLLATE NOCASE",
      [category.as_ref()],
    )
  }

  fn find_by_age_threshold(&self, bracket: AgeBracket) -> Result<Vec<Client>> {
    // NULL ages fail both comparisons, so legacy rows land in neither bracket.
    let filter = match bracket {
      AgeBracket::Adult => "Edad >= ?1",
      AgeBracket::Minor => "Edad < ?1",
    };
    self.select_where("find_by_age_threshold", filter, [ADULT_AGE])
  }
}
