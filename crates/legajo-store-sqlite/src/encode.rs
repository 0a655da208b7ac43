//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Registration timestamps are stored as `%Y-%m-%dT%H:%M:%S` local time.
//! Category and case type are stored by their display names.

use chrono::NaiveDateTime;
use legajo_core::client::Client;

use crate::{Error, Result};

// ─── NaiveDateTime ───────────────────────────────────────────────────────────

pub const STORED_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Rows written by hand or by other tools sometimes use a space separator.
const ALT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn encode_dt(dt: NaiveDateTime) -> String {
  dt.format(STORED_TIMESTAMP_FORMAT).to_string()
}

pub fn decode_dt(s: &str) -> Result<NaiveDateTime> {
  NaiveDateTime::parse_from_str(s, STORED_TIMESTAMP_FORMAT)
    .or_else(|_| NaiveDateTime::parse_from_str(s, ALT_TIMESTAMP_FORMAT))
    .map_err(|e| Error::Decode(format!("bad timestamp {s:?}: {e}")))
}

// ─── Email ───────────────────────────────────────────────────────────────────

/// Emails are case-folded before they reach the table.
pub fn normalize_email(email: &str) -> String { email.trim().to_lowercase() }

// ─── Row type ────────────────────────────────────────────────────────────────

/// Raw values read directly from a `clientes` row.
pub struct RawClient {
  pub id:            i64,
  pub first_name:    String,
  pub last_name:     String,
  pub age:           Option<i64>,
  pub email:         String,
  pub phone:         String,
  pub category:      String,
  pub case_type:     String,
  pub registered_at: Option<String>,
}

impl RawClient {
  /// Read a row selected with [`crate::schema::COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      first_name:    row.get(1)?,
      last_name:     row.get(2)?,
      age:           row.get(3)?,
      email:         row.get(4)?,
      phone:         row.get(5)?,
      category:      row.get(6)?,
      case_type:     row.get(7)?,
      registered_at: row.get(8)?,
    })
  }

  pub fn into_client(self) -> Result<Client> {
    let category = self
      .category
      .parse()
      .map_err(|e| Error::Decode(format!("client {}: {e}", self.id)))?;
    let case_type = self
      .case_type
      .parse()
      .map_err(|e| Error::Decode(format!("client {}: {e}", self.id)))?;
    let age = self
      .age
      .map(u8::try_from)
      .transpose()
      .map_err(|_| {
        Error::Decode(format!("client {}: age {:?} out of range", self.id, self.age))
      })?;
    let registered_at = self.registered_at.as_deref().map(decode_dt).transpose()?;

    Ok(Client {
      id: self.id,
      first_name: self.first_name,
      last_name: self.last_name,
      age,
      email: self.email,
      phone: self.phone,
      category,
      case_type,
      registered_at,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn timestamps_use_iso_like_storage_format() {
    let dt = decode_dt("2024-02-29T23:59:01").unwrap();
    assert_eq!(encode_dt(dt), "2024-02-29T23:59:01");
    assert_eq!(decode_dt("2024-02-29 23:59:01").unwrap(), dt);
    assert!(matches!(decode_dt("29-02-2024"), Err(Error::Decode(_))));
  }

  #[test]
  fn emails_are_trimmed_and_lowercased() {
    assert_eq!(normalize_email("  Ana@X.COM "), "ana@x.com");
  }
}
