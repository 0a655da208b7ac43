//! The `ClientStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `legajo-store-sqlite`).
//! The backup exporter and the `legajo` binary depend on this abstraction.

use crate::{
  case::CaseCategory,
  client::{AgeBracket, Client, ClientInput},
};

/// Abstraction over a client registry backend.
///
/// Every call is synchronous and self-contained: a backend acquires whatever
/// connection it needs, does its work, and releases it before returning.
/// "Not found" is an ordinary outcome (`None` / `false`), never an error.
pub trait ClientStore {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Bring the persisted schema up to date. Safe to call on every startup.
  fn initialize(&self) -> Result<(), Self::Error>;

  /// Persist a new client and return its id. The backend assigns `id` and
  /// `registered_at`, and lower-cases the email.
  ///
  /// Fails if another client already uses the email (in any letter case).
  fn insert(&self, input: &ClientInput) -> Result<i64, Self::Error>;

  fn get_by_id(&self, id: i64) -> Result<Option<Client>, Self::Error>;

  /// Case-insensitive lookup.
  fn get_by_email(&self, email: &str) -> Result<Option<Client>, Self::Error>;

  /// Overwrite the writable fields of client `id`. Returns `false` if there is
  /// no such client. `id` and `registered_at` are never touched.
  ///
  /// Fails if the new email belongs to a different client.
  fn update(&self, id: i64, input: &ClientInput) -> Result<bool, Self::Error>;

  /// Hard delete. Returns `false` if there is no such client.
  fn delete(&self, id: i64) -> Result<bool, Self::Error>;

  /// Every client, ordered by id.
  fn list_all(&self) -> Result<Vec<Client>, Self::Error>;

  /// Clients whose case falls under `category`, ordered by id.
  fn find_by_category(
    &self,
    category: CaseCategory,
  ) -> Result<Vec<Client>, Self::Error>;

  /// Clients in the given age bracket, ordered by id. Clients without a
  /// recorded age are in neither bracket.
  fn find_by_age_threshold(
    &self,
    bracket: AgeBracket,
  ) -> Result<Vec<Client>, Self::Error>;
}
