//! SQLite backend for the Legajo client registry.
//!
//! Every operation opens its own [`rusqlite::Connection`] to the database file
//! and closes it before returning; no connection outlives a call.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
