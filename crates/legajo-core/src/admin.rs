//! Shared-secret gate for the administrative views (listing every client and
//! triggering a backup).
//!
//! This is a weak trust boundary: the secret is held in memory and compared
//! verbatim. There is no hashing, lockout or rate limiting.

use crate::{Error, Result};

#[derive(Clone)]
pub struct AdminGate {
  secret: String,
}

impl AdminGate {
  pub fn new(secret: impl Into<String>) -> Self {
    Self { secret: secret.into() }
  }

  /// Exact string comparison against the configured secret.
  pub fn check(&self, attempt: &str) -> bool { attempt == self.secret }

  pub fn authorize(&self, attempt: &str) -> Result<()> {
    if self.check(attempt) {
      Ok(())
    } else {
      tracing::warn!("administrative access denied");
      Err(Error::AccessDenied)
    }
  }
}

impl std::fmt::Debug for AdminGate {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AdminGate").finish_non_exhaustive()
  }
}
