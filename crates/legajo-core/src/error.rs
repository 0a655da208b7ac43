//! Error types for `legajo-core`.

use thiserror::Error;

use crate::case::CaseCategory;

#[derive(Debug, Error)]
pub enum Error {
  #[error("access denied")]
  AccessDenied,

  #[error("unknown case category: {0:?}")]
  UnknownCategory(String),

  #[error("unknown case type: {0:?}")]
  UnknownCaseType(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A field of a [`ClientInput`](crate::client::ClientInput) that failed
/// validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("first name must be letters only, at most {max} characters")]
  FirstName { max: usize },

  #[error("last name must be letters only, at most {max} characters")]
  LastName { max: usize },

  #[error("age must be between {min} and {max}")]
  Age { min: u8, max: u8 },

  #[error("email is malformed or longer than {max} characters")]
  Email { max: usize },

  #[error("phone must be digits only, at most {max} characters")]
  Phone { max: usize },

  #[error("case type {case_type:?} does not belong to {category}")]
  CaseTypeMismatch {
    category:  CaseCategory,
    case_type: String,
  },
}
