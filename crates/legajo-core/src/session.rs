//! In-memory history of the actions taken during one session.
//!
//! Nothing here is persisted. The log is an explicit value owned by the
//! caller and handed by `&mut` to whatever should record history.

use std::fmt;

use chrono::{Local, NaiveDateTime};
use serde::Serialize;

use crate::{
  case::{CaseCategory, CaseType},
  client::{Client, DISPLAY_TIMESTAMP_FORMAT},
};

/// An operator action worth remembering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Action {
  AddClient,
  SearchClient,
  UpdateClient,
  DeleteClient,
  ListClients,
  ListAdults,
  ListMinors,
  SearchByCategory,
  Backup,
  ShowHistory,
}

impl fmt::Display for Action {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let label = match self {
      Self::AddClient => "Agregar cliente",
      Self::SearchClient => "Buscar cliente por ID/Email",
      Self::UpdateClient => "Actualizar cliente",
      Self::DeleteClient => "Eliminar cliente",
      Self::ListClients => "Mostrar todos los clientes",
      Self::ListAdults => "Mostrar clientes mayores de edad",
      Self::ListMinors => "Mostrar clientes menores de edad",
      Self::SearchByCategory => "Buscar por fuero",
      Self::Backup => "Generar respaldo",
      Self::ShowHistory => "Mostrar historial de acciones",
    };
    f.write_str(label)
  }
}

/// The details kept about a newly added client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientSummary {
  pub id:         i64,
  pub first_name: String,
  pub last_name:  String,
  pub age:        Option<u8>,
  pub category:   CaseCategory,
  pub case_type:  CaseType,
}

impl From<&Client> for ClientSummary {
  fn from(c: &Client) -> Self {
    Self {
      id:         c.id,
      first_name: c.first_name.clone(),
      last_name:  c.last_name.clone(),
      age:        c.age,
      category:   c.category,
      case_type:  c.case_type,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionEntry {
  pub action: Action,
  pub at:     NaiveDateTime,
  pub client: Option<ClientSummary>,
}

impl fmt::Display for SessionEntry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let at = self.at.format(DISPLAY_TIMESTAMP_FORMAT);
    match &self.client {
      Some(c) => {
        writeln!(f, "{}:", self.action)?;
        writeln!(f, "   - ID: {}", c.id)?;
        writeln!(f, "   - Cliente: {} {}", c.first_name, c.last_name)?;
        match c.age {
          Some(age) => writeln!(f, "   - Edad: {age}")?,
          None => writeln!(f, "   - Edad: N/A")?,
        }
        writeln!(f, "   - Fuero: {}", c.category)?;
        writeln!(f, "   - Tipo de caso: {}", c.case_type)?;
        write!(f, "   - Fecha: {at}")
      }
      None => write!(f, "{} (Fecha: {at})", self.action),
    }
  }
}

/// Append-only, ordered record of session actions.
#[derive(Debug, Default)]
pub struct SessionLog {
  entries: Vec<SessionEntry>,
}

impl SessionLog {
  pub fn new() -> Self { Self::default() }

  /// Append `action`, stamped with the current local time.
  pub fn record(&mut self, action: Action) {
    self.push(action, None, Local::now().naive_local());
  }

  /// Append `action` together with the client it concerned.
  pub fn record_client(&mut self, action: Action, client: &Client) {
    self.push(action, Some(client.into()), Local::now().naive_local());
  }

  pub fn push(
    &mut self,
    action: Action,
    client: Option<ClientSummary>,
    at: NaiveDateTime,
  ) {
    self.entries.push(SessionEntry { action, at, client });
  }

  pub fn entries(&self) -> &[SessionEntry] { &self.entries }

  pub fn len(&self) -> usize { self.entries.len() }

  pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}
