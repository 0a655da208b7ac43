//! Integration tests for `SqliteStore` against an on-disk database in a
//! temporary directory.

use legajo_core::{
  case::{CaseCategory, CaseType},
  client::{AgeBracket, ClientInput},
  store::ClientStore,
};
use rusqlite::Connection;
use tempfile::TempDir;

use crate::{Error, SqliteStore, schema};

fn store() -> (TempDir, SqliteStore) {
  let dir = TempDir::new().expect("temp dir");
  let store = SqliteStore::open(dir.path().join("clientes.db")).expect("store");
  (dir, store)
}

fn input(first: &str, email: &str, age: Option<u8>) -> ClientInput {
  ClientInput {
    first_name: first.into(),
    last_name:  "Gomez".into(),
    age,
    email:      email.into(),
    phone:      "1122334455".into(),
    category:   CaseCategory::Civil,
    case_type:  CaseType::Divorcio,
  }
}

fn ana() -> ClientInput { input("Ana", "ana@x.com", Some(30)) }

// ─── Schema ──────────────────────────────────────────────────────────────────

#[test]
fn initialize_is_idempotent() {
  let (dir, s) = store();
  s.insert(&ana()).unwrap();

  s.initialize().unwrap();
  s.initialize().unwrap();
  let reopened = SqliteStore::open(dir.path().join("clientes.db")).unwrap();

  assert_eq!(reopened.list_all().unwrap().len(), 1);
}

#[test]
fn initialize_records_schema_version() {
  let (_dir, s) = store();
  let conn = Connection::open(s.path()).unwrap();
  let version: i64 = conn
    .query_row("PRAGMA user_version", [], |r| r.get(0))
    .unwrap();
  assert_eq!(version, schema::current_version());
}

#[test]
fn legacy_table_gains_new_columns_and_keeps_rows() {
  let dir = TempDir::new().unwrap();
  let path = dir.path().join("clientes.db");

  {
    let conn = Connection::open(&path).unwrap();
    conn
      .execute_batch(
        "CREATE TABLE clientes (
           ID INTEGER PRIMARY KEY AUTOINCREMENT,
           Nombre TEXT NOT NULL,
           Apellido TEXT NOT NULL,
           Email TEXT UNIQUE NOT NULL,
           Telefono TEXT NOT NULL,
           Fuero TEXT NOT NULL,
           Tipo_de_caso TEXT NOT NULL
         );
         INSERT INTO clientes (Nombre, Apellido, Email, Telefono, Fuero, Tipo_de_caso)
         VALUES ('Luis', 'Paz', 'luis@x.com', '555', 'Laboral', 'Accidente de trabajo');",
      )
      .unwrap();
  }

  let s = SqliteStore::open(&path).unwrap();

  let luis = s.get_by_id(1).unwrap().unwrap();
  assert_eq!(luis.first_name, "Luis");
  assert_eq!(luis.case_type, CaseType::AccidenteDeTrabajo);
  assert_eq!(luis.age, None);
  assert_eq!(luis.registered_at, None);

  let id = s.insert(&ana()).unwrap();
  assert_eq!(id, 2);
  assert!(s.get_by_id(id).unwrap().unwrap().registered_at.is_some());

  // Running the migrations again changes nothing.
  s.initialize().unwrap();
  assert_eq!(s.list_all().unwrap().len(), 2);
}

fn legacy_db(dir: &TempDir, rows: &str) -> std::path::PathBuf {
  let path = dir.path().join("clientes.db");
  let conn = Connection::open(&path).unwrap();
  conn
    .execute_batch(&format!(
      "CREATE TABLE clientes (
         ID INTEGER PRIMARY KEY AUTOINCREMENT,
         Nombre TEXT NOT NULL,
         Apellido TEXT NOT NULL,
         Email TEXT UNIQUE NOT NULL,
         Telefono TEXT NOT NULL,
         Fuero TEXT NOT NULL,
         Tipo_de_caso TEXT NOT NULL
       );
       INSERT INTO clientes (Nombre, Apellido, Email, Telefono, Fuero, Tipo_de_caso)
       VALUES {rows};"
    ))
    .unwrap();
  path
}

#[test]
fn legacy_emails_differing_in_case_keep_the_lowest_id() {
  let dir = TempDir::new().unwrap();
  let path = legacy_db(
    &dir,
    "('Luis', 'Paz', 'Luis@x.com', '555', 'Laboral', 'Accidente de trabajo'),
     ('Luisa', 'Paz', 'luis@x.com', '556', 'Civil', 'Divorcio'),
     ('Eva', 'Sol', ' Eva@X.com ', '557', 'Penal', 'Robo')",
  );

  let s = SqliteStore::open(&path).unwrap();
  SqliteStore::open(&path).unwrap();

  let all = s.list_all().unwrap();
  let kept: Vec<_> = all.iter().map(|c| (c.id, c.email.as_str())).collect();
  assert_eq!(kept, [(1, "luis@x.com"), (3, "eva@x.com")]);

  let conn = Connection::open(&path).unwrap();
  let moved: (i64, String) = conn
    .query_row("SELECT ID, Email FROM clientes_email_conflicts", [], |r| {
      Ok((r.get(0)?, r.get(1)?))
    })
    .unwrap();
  assert_eq!(moved, (2, "luis@x.com".to_owned()));

  let err = s.insert(&input("Otro", "LUIS@X.COM", None)).unwrap_err();
  assert!(matches!(err, Error::DuplicateEmail(_)));
  assert!(s.insert(&ana()).unwrap() > 3);
}

#[test]
fn legacy_lower_case_category_is_found_by_category() {
  let dir = TempDir::new().unwrap();
  let path = legacy_db(&dir, "('Luis', 'Paz', 'luis@x.com', '555', 'penal', 'Robo')");

  let s = SqliteStore::open(&path).unwrap();
  let penal = s.find_by_category(CaseCategory::Penal).unwrap();
  assert_eq!(penal.len(), 1);
  assert_eq!(penal[0].category, CaseCategory::Penal);
}

#[test]
fn unreadable_row_is_a_decode_error() {
  let (_dir, s) = store();
  s.insert(&ana()).unwrap();

  let conn = Connection::open(s.path()).unwrap();
  conn
    .execute("UPDATE clientes SET Fuero = 'Comercial' WHERE ID = 1", [])
    .unwrap();

  assert!(matches!(s.get_by_id(1), Err(Error::Decode(_))));
}

// ─── Insert & read ───────────────────────────────────────────────────────────

#[test]
fn insert_then_get_by_id_returns_same_fields() {
  let (_dir, s) = store();

  let id = s.insert(&ana()).unwrap();
  assert_eq!(id, 1);

  let got = s.get_by_id(id).unwrap().unwrap();
  assert_eq!(got.id, id);
  assert_eq!(got.to_input(), ana());
  assert!(got.registered_at.is_some());
  assert!(got.registered_at_display().is_some());
}

#[test]
fn get_by_id_missing_returns_none() {
  let (_dir, s) = store();
  assert!(s.get_by_id(42).unwrap().is_none());
}

#[test]
fn get_by_email_ignores_case() {
  let (_dir, s) = store();
  let id = s.insert(&ana()).unwrap();

  let got = s.get_by_email("ANA@X.COM").unwrap().unwrap();
  assert_eq!(got.id, id);
  assert!(s.get_by_email("nobody@x.com").unwrap().is_none());
}

#[test]
fn email_is_lowercased_on_write() {
  let (_dir, s) = store();
  let id = s.insert(&input("Ana", "Ana@X.Com", None)).unwrap();
  assert_eq!(s.get_by_id(id).unwrap().unwrap().email, "ana@x.com");
}

#[test]
fn duplicate_email_in_any_case_is_rejected() {
  let (_dir, s) = store();
  s.insert(&ana()).unwrap();

  let err = s.insert(&input("Otra", "ANA@x.com", None)).unwrap_err();
  assert!(matches!(err, Error::DuplicateEmail(ref e) if e == "ana@x.com"));

  let all = s.list_all().unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].first_name, "Ana");
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[test]
fn update_changes_fields_but_not_registration() {
  let (_dir, s) = store();
  let id = s.insert(&ana()).unwrap();
  let before = s.get_by_id(id).unwrap().unwrap();

  let mut changes = ana();
  changes.phone = "999".into();
  changes.category = CaseCategory::Familia;
  changes.case_type = CaseType::Tenencia;
  assert!(s.update(id, &changes).unwrap());

  let after = s.get_by_id(id).unwrap().unwrap();
  assert_eq!(after.phone, "999");
  assert_eq!(after.case_type, CaseType::Tenencia);
  assert_eq!(after.id, before.id);
  assert_eq!(after.registered_at, before.registered_at);
}

#[test]
fn update_keeping_own_email_succeeds() {
  let (_dir, s) = store();
  let id = s.insert(&ana()).unwrap();
  assert!(s.update(id, &input("Ana", "ANA@X.COM", Some(31))).unwrap());
  assert_eq!(s.get_by_id(id).unwrap().unwrap().age, Some(31));
}

#[test]
fn update_missing_id_returns_false() {
  let (_dir, s) = store();
  assert!(!s.update(7, &ana()).unwrap());
  assert!(s.list_all().unwrap().is_empty());
}

#[test]
fn update_to_other_clients_email_is_rejected() {
  let (_dir, s) = store();
  s.insert(&ana()).unwrap();
  let bob = s.insert(&input("Bob", "bob@x.com", Some(40))).unwrap();

  let err = s.update(bob, &input("Bob", "Ana@x.com", Some(40))).unwrap_err();
  assert!(matches!(err, Error::DuplicateEmail(_)));

  let unchanged = s.get_by_id(bob).unwrap().unwrap();
  assert_eq!(unchanged.email, "bob@x.com");
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[test]
fn delete_twice_returns_false_the_second_time() {
  let (_dir, s) = store();
  let id = s.insert(&ana()).unwrap();
  s.insert(&input("Bob", "bob@x.com", None)).unwrap();

  assert!(s.delete(id).unwrap());
  assert!(!s.delete(id).unwrap());
  assert!(!s.delete(999).unwrap());
  assert_eq!(s.list_all().unwrap().len(), 1);
}

#[test]
fn ids_are_not_reused_after_delete() {
  let (_dir, s) = store();
  let first = s.insert(&ana()).unwrap();
  assert!(s.delete(first).unwrap());

  let second = s.insert(&ana()).unwrap();
  assert!(second > first);
}

// ─── Queries ─────────────────────────────────────────────────────────────────

#[test]
fn list_all_is_ordered_by_id() {
  let (_dir, s) = store();
  for (name, email) in [("Ana", "a@x.com"), ("Bob", "b@x.com"), ("Cia", "c@x.com")] {
    s.insert(&input(name, email, None)).unwrap();
  }
  s.delete(2).unwrap();

  let ids: Vec<_> = s.list_all().unwrap().iter().map(|c| c.id).collect();
  assert_eq!(ids, [1, 3]);
}

#[test]
fn find_by_category_filters_and_orders() {
  let (_dir, s) = store();
  s.insert(&ana()).unwrap();

  let mut penal = input("Bob", "bob@x.com", None);
  penal.category = CaseCategory::Penal;
  penal.case_type = CaseType::Robo;
  s.insert(&penal).unwrap();
  s.insert(&input("Cia", "cia@x.com", None)).unwrap();

  let civil = s.find_by_category(CaseCategory::Civil).unwrap();
  let ids: Vec<_> = civil.iter().map(|c| c.id).collect();
  assert_eq!(ids, [1, 3]);

  assert_eq!(s.find_by_category(CaseCategory::Penal).unwrap().len(), 1);
  assert!(s.find_by_category(CaseCategory::Familia).unwrap().is_empty());
}

#[test]
fn age_brackets_partition_clients_with_known_age() {
  let (_dir, s) = store();
  let ages = [Some(30), None, Some(17), Some(18), Some(0), None];
  for (i, age) in ages.into_iter().enumerate() {
    s.insert(&input("Ana", &format!("c{i}@x.com"), age)).unwrap();
  }

  let adults = s.find_by_age_threshold(AgeBracket::Adult).unwrap();
  let minors = s.find_by_age_threshold(AgeBracket::from_is_adult(false)).unwrap();

  let adult_ids: Vec<_> = adults.iter().map(|c| c.id).collect();
  let minor_ids: Vec<_> = minors.iter().map(|c| c.id).collect();
  assert_eq!(adult_ids, [1, 4]);
  assert_eq!(minor_ids, [3, 5]);

  let mut union: Vec<_> = adult_ids.iter().chain(&minor_ids).copied().collect();
  union.sort_unstable();
  let with_age: Vec<_> = s
    .list_all()
    .unwrap()
    .into_iter()
    .filter(|c| c.age.is_some())
    .map(|c| c.id)
    .collect();
  assert_eq!(union, with_age);
}

// ─── Failures ────────────────────────────────────────────────────────────────

#[test]
fn unopenable_path_is_a_storage_error() {
  let dir = TempDir::new().unwrap();
  let err = SqliteStore::open(dir.path().join("missing").join("clientes.db"))
    .unwrap_err();
  assert!(matches!(err, Error::Storage(_)));
}
