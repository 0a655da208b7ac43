//! The closed case taxonomy: a jurisdiction (fuero) and the case types that
//! belong to it.
//!
//! Both enums display with their Spanish names, which are also the values
//! persisted in the `Fuero` and `Tipo_de_caso` columns. Parsing is lenient:
//! case, accents and `-`/`_` separators are ignored, so `narcotrafico` and
//! `accidente-de-trabajo` are accepted alongside the display names.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, IntoEnumIterator as _};

use crate::Error;

// ─── CaseCategory ────────────────────────────────────────────────────────────

/// Legal jurisdiction of a client's case.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter,
  Serialize, Deserialize,
)]
pub enum CaseCategory {
  Penal,
  Civil,
  Laboral,
  Familia,
}

impl CaseCategory {
  /// The case types belonging to this category, in menu order.
  pub fn case_types(self) -> &'static [CaseType] {
    use CaseType::*;
    match self {
      Self::Penal => &[Homicidio, Robo, Narcotrafico],
      Self::Civil => &[Divorcio, Sucesiones, Reclamos],
      Self::Laboral => &[Despido, AccidenteDeTrabajo, ReclamoSalarial],
      Self::Familia => &[Adopciones, Tenencia, ViolenciaFamiliar],
    }
  }

  /// All categories, in menu order.
  pub fn all() -> Vec<Self> { Self::iter().collect() }
}

impl FromStr for CaseCategory {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = fold(s);
    Self::iter()
      .find(|c| fold(c.as_ref()) == wanted)
      .ok_or_else(|| Error::UnknownCategory(s.to_owned()))
  }
}

// ─── CaseType ────────────────────────────────────────────────────────────────

/// Case subtype; always constrained by its parent [`CaseCategory`].
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter,
  Serialize, Deserialize,
)]
pub enum CaseType {
  // Penal
  Homicidio,
  Robo,
  #[strum(to_string = "Narcotráfico")]
  #[serde(rename = "Narcotráfico")]
  Narcotrafico,

  // Civil
  Divorcio,
  Sucesiones,
  Reclamos,

  // Laboral
  Despido,
  #[strum(to_string = "Accidente de trabajo")]
  #[serde(rename = "Accidente de trabajo")]
  AccidenteDeTrabajo,
  #[strum(to_string = "Reclamo salarial")]
  #[serde(rename = "Reclamo salarial")]
  ReclamoSalarial,

  // Familia
  Adopciones,
  Tenencia,
  #[strum(to_string = "Violencia familiar")]
  #[serde(rename = "Violencia familiar")]
  ViolenciaFamiliar,
}

impl CaseType {
  /// The category this case type belongs to.
  pub fn category(self) -> CaseCategory {
    use CaseType::*;
    match self {
      Homicidio | Robo | Narcotrafico => CaseCategory::Penal,
      Divorcio | Sucesiones | Reclamos => CaseCategory::Civil,
      Despido | AccidenteDeTrabajo | ReclamoSalarial => CaseCategory::Laboral,
      Adopciones | Tenencia | ViolenciaFamiliar => CaseCategory::Familia,
    }
  }

  pub fn belongs_to(self, category: CaseCategory) -> bool {
    self.category() == category
  }
}

impl FromStr for CaseType {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = fold(s);
    Self::iter()
      .find(|t| fold(&t.to_string()) == wanted)
      .ok_or_else(|| Error::UnknownCaseType(s.to_owned()))
  }
}

// ─── Parsing helpers ─────────────────────────────────────────────────────────

/// Lower-case, strip Spanish accents, and treat `-`/`_` as spaces.
fn fold(s: &str) -> String {
  s.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
    .filter(|w| !w.is_empty())
    .map(|w| {
      w.chars()
        .map(|c| match c.to_lowercase().next().unwrap_or(c) {
          'á' => 'a',
          'é' => 'e',
          'í' => 'i',
          'ó' => 'o',
          'ú' | 'ü' => 'u',
          other => other,
        })
        .collect::<String>()
    })
    .collect::<Vec<_>>()
    .join(" ")
}
