//! SQL schema and migrations for the Legajo SQLite store.
//!
//! Table and column names match the data files written by earlier versions
//! of the registry, so an existing `clientes.db` opens in place. Migrations
//! run in order inside one transaction; each step first probes the live
//! schema and is skipped when its change is already present. Afterwards
//! `PRAGMA user_version` records the number of known steps.
//!
//! Earlier versions compared emails case-sensitively, so a legacy table may
//! hold two rows whose emails differ only in case. Before the case-insensitive
//! index is built, the row with the lowest id keeps the email and the others
//! are moved to `clientes_email_conflicts`, where nothing is lost.

use rusqlite::{Connection, OptionalExtension as _};

pub const TABLE: &str = "clientes";

/// Column list in the order expected by [`crate::encode::RawClient::from_row`].
pub const COLUMNS: &str = "ID, Nombre, Apellido, Edad, Email, Telefono, Fuero, \
                           Tipo_de_caso, Fecha_registro";

const EMAIL_INDEX: &str = "clientes_email_nocase";

/// Full current table definition. `AUTOINCREMENT` keeps ids from being reused
/// after a delete.
const CREATE_TABLE: &str = "
CREATE TABLE IF NOT EXISTS clientes (
    ID             INTEGER PRIMARY KEY AUTOINCREMENT,
    Nombre         TEXT NOT NULL,
    Apellido       TEXT NOT NULL,
    Edad           INTEGER,                -- NULL for legacy rows
    Email          TEXT UNIQUE NOT NULL,   -- stored lower-case
    Telefono       TEXT NOT NULL,
    Fuero          TEXT NOT NULL,
    Tipo_de_caso   TEXT NOT NULL,
    Fecha_registro TEXT                    -- %Y-%m-%dT%H:%M:%S, local time
);
";

const ADD_REGISTERED_AT: &str =
  "ALTER TABLE clientes ADD COLUMN Fecha_registro TEXT;";

const ADD_AGE: &str = "ALTER TABLE clientes ADD COLUMN Edad INTEGER;";

const CONFLICTS_TABLE: &str = "clientes_email_conflicts";

const CREATE_CONFLICTS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS clientes_email_conflicts AS
    SELECT * FROM clientes WHERE 0;
";

/// Rows whose folded email was already taken by a row with a lower id.
const SELECT_SHADOWED: &str = "
SELECT c.ID, c.Email,
       (SELECT min(o.ID) FROM clientes o
         WHERE lower(trim(o.Email)) = lower(trim(c.Email)))
  FROM clientes c
 WHERE EXISTS (SELECT 1 FROM clientes o
                WHERE lower(trim(o.Email)) = lower(trim(c.Email))
                  AND o.ID < c.ID)
 ORDER BY c.ID;
";

const CREATE_EMAIL_INDEX: &str = "
CREATE UNIQUE INDEX IF NOT EXISTS clientes_email_nocase
    ON clientes (Email COLLATE NOCASE);
";

// ─── Migration list ──────────────────────────────────────────────────────────

/// A row moved aside because its email only differed in case from the email
/// of an earlier row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetAside {
  pub id:      i64,
  pub email:   String,
  /// The row that kept the email.
  pub kept_id: i64,
}

/// What a call to [`migrate`] changed.
#[derive(Debug, Default)]
pub struct Migrated {
  pub applied:   usize,
  pub set_aside: Vec<SetAside>,
}

type Step = fn(&Connection, &mut Migrated) -> rusqlite::Result<()>;

struct Migration {
  name:   &'static str,
  /// Probe the live schema; `true` means the step still has to run.
  needed: fn(&Connection) -> rusqlite::Result<bool>,
  apply:  Step,
}

static MIGRATIONS: &[Migration] = &[
  Migration {
    name:   "create_clientes",
    needed: table_missing,
    apply:  |conn, _| conn.execute_batch(CREATE_TABLE),
  },
  Migration {
    name:   "add_fecha_registro",
    needed: registered_at_missing,
    apply:  |conn, _| conn.execute_batch(ADD_REGISTERED_AT),
  },
  Migration {
    name:   "add_edad",
    needed: age_missing,
    apply:  |conn, _| conn.execute_batch(ADD_AGE),
  },
  Migration {
    name:   "fold_email_case",
    needed: emails_unfolded,
    apply:  fold_email_case,
  },
  Migration {
    name:   "unique_email_nocase",
    needed: email_index_missing,
    apply:  |conn, _| conn.execute_batch(CREATE_EMAIL_INDEX),
  },
];

/// Schema version written to `PRAGMA user_version` once all steps ran.
pub fn current_version() -> i64 { MIGRATIONS.len() as i64 }

/// Apply every outstanding migration.
pub fn migrate(conn: &mut Connection) -> rusqlite::Result<Migrated> {
  let tx = conn.transaction()?;
  let mut report = Migrated::default();

  for m in MIGRATIONS {
    if (m.needed)(&tx)? {
      (m.apply)(&tx, &mut report)?;
      tracing::info!(migration = m.name, "applied schema migration");
      report.applied += 1;
    }
  }

  tx.pragma_update(None, "user_version", current_version())?;
  tx.commit()?;
  Ok(report)
}

/// Lower-case and trim every email, first moving aside the rows that would
/// collide with an earlier one.
fn fold_email_case(
  conn: &Connection,
  report: &mut Migrated,
) -> rusqlite::Result<()> {
  let mut stmt = conn.prepare(SELECT_SHADOWED)?;
  let shadowed = stmt
    .query_map([], |row| {
      Ok(SetAside {
        id:      row.get(0)?,
        email:   row.get(1)?,
        kept_id: row.get(2)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  if !shadowed.is_empty() {
    conn.execute_batch(CREATE_CONFLICTS_TABLE)?;
  }
  for row in &shadowed {
    conn.execute(
      &format!("INSERT INTO {CONFLICTS_TABLE} SELECT * FROM {TABLE} WHERE ID = ?1"),
      [row.id],
    )?;
    conn.execute(&format!("DELETE FROM {TABLE} WHERE ID = ?1"), [row.id])?;
  }

  conn.execute(
    "UPDATE clientes SET Email = lower(trim(Email))
      WHERE Email <> lower(trim(Email))",
    [],
  )?;
  report.set_aside.extend(shadowed);
  Ok(())
}

// ─── Probes ──────────────────────────────────────────────────────────────────

fn table_missing(conn: &Connection) -> rusqlite::Result<bool> {
  let found = conn
    .query_row(
      "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
      [TABLE],
      |_| Ok(()),
    )
    .optional()?;
  Ok(found.is_none())
}

fn registered_at_missing(conn: &Connection) -> rusqlite::Result<bool> {
  Ok(!has_column(conn, "Fecha_registro")?)
}

fn age_missing(conn: &Connection) -> rusqlite::Result<bool> {
  Ok(!has_column(conn, "Edad")?)
}

fn emails_unfolded(conn: &Connection) -> rusqlite::Result<bool> {
  let found = conn
    .query_row(
      "SELECT 1 FROM clientes WHERE Email <> lower(trim(Email)) LIMIT 1",
      [],
      |_| Ok(()),
    )
    .optional()?;
  Ok(found.is_some())
}

fn email_index_missing(conn: &Connection) -> rusqlite::Result<bool> {
  let found = conn
    .query_row(
      "SELECT 1 FROM sqlite_master WHERE type = 'index' AND name = ?1",
      [EMAIL_INDEX],
      |_| Ok(()),
    )
    .optional()?;
  Ok(found.is_none())
}

fn has_column(conn: &Connection, column: &str) -> rusqlite::Result<bool> {
  let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
  let names = stmt
    .query_map([TABLE], |row| row.get::<_, String>(0))?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(names.iter().any(|n| n.eq_ignore_ascii_case(column)))
}
