//! The client record, the registry's only entity.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::case::{CaseCategory, CaseType};

/// `strftime` pattern used wherever a registration timestamp is shown.
pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Age at which a client counts as an adult.
pub const ADULT_AGE: u8 = 18;

// ─── ClientInput ─────────────────────────────────────────────────────────────

/// The caller-writable fields of a client, accepted by both
/// [`ClientStore::insert`](crate::store::ClientStore::insert) and
/// [`ClientStore::update`](crate::store::ClientStore::update).
///
/// `id` and `registered_at` are always assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInput {
  pub first_name: String,
  pub last_name:  String,
  pub age:        Option<u8>,
  pub email:      String,
  pub phone:      String,
  pub category:   CaseCategory,
  pub case_type:  CaseType,
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// A persisted client record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
  pub id:            i64,
  pub first_name:    String,
  pub last_name:     String,
  /// Absent for rows written before the age column existed.
  pub age:           Option<u8>,
  /// Always stored lower-case.
  pub email:         String,
  pub phone:         String,
  pub category:      CaseCategory,
  pub case_type:     CaseType,
  /// Store-assigned at insert and never changed afterwards. Absent only for
  /// rows that predate the column.
  pub registered_at: Option<NaiveDateTime>,
}

impl Client {
  /// `registered_at` rendered as `dd-mm-YYYY HH:MM:SS`.
  pub fn registered_at_display(&self) -> Option<String> {
    self
      .registered_at
      .map(|at| at.format(DISPLAY_TIMESTAMP_FORMAT).to_string())
  }

  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }

  /// The writable fields of this record, e.g. as the starting point for an
  /// update.
  pub fn to_input(&self) -> ClientInput {
    ClientInput {
      first_name: self.first_name.clone(),
      last_name:  self.last_name.clone(),
      age:        self.age,
      email:      self.email.clone(),
      phone:      self.phone.clone(),
      category:   self.category,
      case_type:  self.case_type,
    }
  }
}

// ─── AgeBracket ──────────────────────────────────────────────────────────────

/// Partition used by
/// [`ClientStore::find_by_age_threshold`](crate::store::ClientStore::find_by_age_threshold).
///
/// Clients without a recorded age belong to neither bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeBracket {
  /// Age ≥ [`ADULT_AGE`].
  Adult,
  /// Age < [`ADULT_AGE`].
  Minor,
}

impl AgeBracket {
  pub fn from_is_adult(is_adult: bool) -> Self {
    if is_adult { Self::Adult } else { Self::Minor }
  }

  pub fn contains(self, age: Option<u8>) -> bool {
    match (self, age) {
      (_, None) => false,
      (Self::Adult, Some(a)) => a >= ADULT_AGE,
      (Self::Minor, Some(a)) => a < ADULT_AGE,
    }
  }
}
