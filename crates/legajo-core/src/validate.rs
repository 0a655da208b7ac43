//! Input validation: pure predicates and normalisers with no I/O.
//!
//! The interactive retry loops live in the presentation layer; this module
//! only answers whether a value is acceptable.

use std::sync::LazyLock;

use regex::Regex;

use crate::{ValidationError, client::ClientInput};

pub const MAX_LEN_NAME: usize = 50;
pub const MAX_LEN_EMAIL: usize = 255;
pub const MAX_LEN_PHONE: usize = 20;
/// Limit for the category and case type columns.
pub const MAX_LEN_CASE_FIELD: usize = 50;

pub const MIN_AGE: u8 = 0;
pub const MAX_AGE: u8 = 120;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[\w.-]+@[\w.-]+\.\w+$").expect("email pattern is valid")
});

// ─── Predicates ──────────────────────────────────────────────────────────────

/// `local@domain.tld`, where local part and domain allow word characters,
/// dots and hyphens, and the domain has at least one dot.
pub fn is_valid_email(s: &str) -> bool { EMAIL_PATTERN.is_match(s) }

/// Non-empty and ASCII digits only.
pub fn is_valid_phone(s: &str) -> bool {
  !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Non-blank, at most `max_len` characters, and alphabetic once spaces are
/// removed.
pub fn is_non_empty_alpha(s: &str, max_len: usize) -> bool {
  !s.trim().is_empty()
    && s.chars().count() <= max_len
    && s.chars().filter(|c| *c != ' ').all(char::is_alphabetic)
}

/// Age within the default `0..=120` range.
pub fn is_valid_age(n: i64) -> bool { is_age_within(n, MIN_AGE, MAX_AGE) }

pub fn is_age_within(n: i64, min: u8, max: u8) -> bool {
  (i64::from(min)..=i64::from(max)).contains(&n)
}

fn fits(s: &str, max_len: usize) -> bool { s.chars().count() <= max_len }

// ─── Numeric input ───────────────────────────────────────────────────────────

/// Parse a whole number, ignoring surrounding whitespace.
pub fn parse_integer(s: &str) -> Option<i64> { s.trim().parse().ok() }

/// Parse a 1-based choice from a menu of `count` options.
pub fn parse_menu_choice(s: &str, count: usize) -> Option<usize> {
  let s = s.trim();
  if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
    return None;
  }
  s.parse::<usize>().ok().filter(|n| (1..=count).contains(n))
}

// ─── Normalisation ───────────────────────────────────────────────────────────

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) => first
      .to_uppercase()
      .chain(chars.flat_map(char::to_lowercase))
      .collect(),
    None => String::new(),
  }
}

// ─── Whole-record validation ─────────────────────────────────────────────────

impl ClientInput {
  /// Check every field, reporting the first one that is rejected.
  pub fn validate(&self) -> Result<(), ValidationError> {
    if !is_non_empty_alpha(&self.first_name, MAX_LEN_NAME) {
      return Err(ValidationError::FirstName { max: MAX_LEN_NAME });
    }
    if !is_non_empty_alpha(&self.last_name, MAX_LEN_NAME) {
      return Err(ValidationError::LastName { max: MAX_LEN_NAME });
    }
    if let Some(age) = self.age
      && !is_valid_age(i64::from(age))
    {
      return Err(ValidationError::Age { min: MIN_AGE, max: MAX_AGE });
    }
    if !fits(&self.email, MAX_LEN_EMAIL) || !is_valid_email(&self.email) {
      return Err(ValidationError::Email { max: MAX_LEN_EMAIL });
    }
    if !fits(&self.phone, MAX_LEN_PHONE) || !is_valid_phone(&self.phone) {
      return Err(ValidationError::Phone { max: MAX_LEN_PHONE });
    }
    if !self.case_type.belongs_to(self.category) {
      return Err(ValidationError::CaseTypeMismatch {
        category:  self.category,
        case_type: self.case_type.to_string(),
      });
    }
    Ok(())
  }
}
