//! Error type for `legajo-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Another client already uses this email (compared case-insensitively).
  #[error("a client with email {0:?} already exists")]
  DuplicateEmail(String),

  #[error("database error: {0}")]
  Storage(#[from] rusqlite::Error),

  /// A stored row could not be turned back into a client.
  #[error("unreadable client row: {0}")]
  Decode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
