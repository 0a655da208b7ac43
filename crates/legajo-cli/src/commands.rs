//! Command handlers. Each validates its input, calls the store, records the
//! action in the session log and renders the result to `out`.

use std::{io::Write, path::PathBuf};

use anyhow::{Context as _, bail};
use legajo_core::{
  admin::AdminGate,
  backup::{self, BackupOutcome},
  case::CaseCategory,
  client::{AgeBracket, Client, ClientInput},
  session::{Action, SessionLog},
  store::ClientStore,
  validate::capitalize,
};
use legajo_store_sqlite::SqliteStore;

use crate::cli::{AddArgs, Command, DeleteArgs, ListArgs, ShowArgs, UpdateArgs};

/// Everything a command needs besides its own arguments.
pub struct Context {
  pub store:       SqliteStore,
  pub gate:        AdminGate,
  pub backup_path: PathBuf,
  pub json:        bool,
}

pub fn run(
  command: Command,
  ctx: &Context,
  log: &mut SessionLog,
  out: &mut dyn Write,
) -> anyhow::Result<()> {
  match command {
    Command::Add(args) => add(args, ctx, log, out),
    Command::Show(args) => show(args, ctx, log, out),
    Command::Update(args) => update(args, ctx, log, out),
    Command::Delete(args) => delete(args, ctx, log, out),
    Command::List(args) => list(args, ctx, log, out),
    Command::ByCategory { category } => by_category(category, ctx, log, out),
    Command::Backup { secret } => run_backup(&secret, ctx, log, out),
    Command::Categories => categories(out),
    Command::Shell => bail!("already inside the shell"),
  }
}

// ─── Writes ──────────────────────────────────────────────────────────────────

fn add(
  args: AddArgs,
  ctx: &Context,
  log: &mut SessionLog,
  out: &mut dyn Write,
) -> anyhow::Result<()> {
  let input = ClientInput {
    first_name: capitalize(args.first_name.trim()),
    last_name:  capitalize(args.last_name.trim()),
    age:        args.age,
    email:      args.email.trim().to_lowercase(),
    phone:      args.phone.trim().to_owned(),
    category:   args.category.unwrap_or(args.case_type.category()),
    case_type:  args.case_type,
  };
  input.validate()?;

  let id = ctx.store.insert(&input)?;
  let client = ctx
    .store
    .get_by_id(id)?
    .with_context(|| format!("client {id} missing right after insert"))?;
  log.record_client(Action::AddClient, &client);

  writeln!(out, "Client added with ID {id}.")?;
  Ok(())
}

fn update(
  args: UpdateArgs,
  ctx: &Context,
  log: &mut SessionLog,
  out: &mut dyn Write,
) -> anyhow::Result<()> {
  log.record(Action::UpdateClient);

  let Some(current) = ctx.store.get_by_id(args.id)? else {
    bail!("no client with ID {}", args.id);
  };

  let mut input = current.to_input();
  if let Some(name) = args.first_name {
    input.first_name = capitalize(name.trim());
  }
  if let Some(name) = args.last_name {
    input.last_name = capitalize(name.trim());
  }
  if args.clear_age {
    input.age = None;
  } else if args.age.is_some() {
    input.age = args.age;
  }
  if let Some(email) = args.email {
    input.email = email.trim().to_lowercase();
  }
  if let Some(phone) = args.phone {
    input.phone = phone.trim().to_owned();
  }
  if let Some(case_type) = args.case_type {
    input.category = args.category.unwrap_or(case_type.category());
    input.case_type = case_type;
  }
  input.validate()?;

  if ctx.store.update(args.id, &input)? {
    writeln!(out, "Client {} updated.", args.id)?;
  } else {
    bail!("no client with ID {}", args.id);
  }
  Ok(())
}

fn delete(
  args: DeleteArgs,
  ctx: &Context,
  log: &mut SessionLog,
  out: &mut dyn Write,
) -> anyhow::Result<()> {
  log.record(Action::DeleteClient);

  let Some(client) = ctx.store.get_by_id(args.id)? else {
    bail!("no client with ID {}", args.id);
  };

  if !args.yes {
    writeln!(
      out,
      "About to delete {} (ID {}). Repeat with --yes to confirm.",
      client.full_name(),
      client.id
    )?;
    return Ok(());
  }

  if ctx.store.delete(client.id)? {
    writeln!(out, "Client {} deleted.", client.id)?;
  } else {
    writeln!(out, "Client {} was already gone.", client.id)?;
  }
  Ok(())
}

// ─── Reads ───────────────────────────────────────────────────────────────────

fn show(
  args: ShowArgs,
  ctx: &Context,
  log: &mut SessionLog,
  out: &mut dyn Write,
) -> anyhow::Result<()> {
  log.record(Action::SearchClient);

  let found = match (args.id, args.email) {
    (Some(id), _) => ctx.store.get_by_id(id)?,
    (None, Some(email)) => ctx.store.get_by_email(&email)?,
    (None, None) => bail!("give either --id or --email"),
  };

  match found {
    Some(client) => print_clients(std::slice::from_ref(&client), ctx.json, out),
    None => {
      writeln!(out, "Client not found.")?;
      Ok(())
    }
  }
}

fn list(
  args: ListArgs,
  ctx: &Context,
  log: &mut SessionLog,
  out: &mut dyn Write,
) -> anyhow::Result<()> {
  ctx.gate.authorize(&args.secret)?;

  let clients = if args.adults {
    log.record(Action::ListAdults);
    ctx.store.find_by_age_threshold(AgeBracket::Adult)?
  } else if args.minors {
    log.record(Action::ListMinors);
    ctx.store.find_by_age_threshold(AgeBracket::Minor)?
  } else {
    log.record(Action::ListClients);
    ctx.store.list_all()?
  };

  if clients.is_empty() && !ctx.json {
    writeln!(out, "No clients registered.")?;
    return Ok(());
  }
  print_clients(&clients, ctx.json, out)
}

fn by_category(
  category: CaseCategory,
  ctx: &Context,
  log: &mut SessionLog,
  out: &mut dyn Write,
) -> anyhow::Result<()> {
  log.record(Action::SearchByCategory);

  let clients = ctx.store.find_by_category(category)?;
  if clients.is_empty() && !ctx.json {
    writeln!(out, "No clients under {category}.")?;
    return Ok(());
  }
  print_clients(&clients, ctx.json, out)
}

fn run_backup(
  secret: &str,
  ctx: &Context,
  log: &mut SessionLog,
  out: &mut dyn Write,
) -> anyhow::Result<()> {
  ctx.gate.authorize(secret)?;
  log.record(Action::Backup);

  match backup::export(&ctx.store, &ctx.backup_path)? {
    BackupOutcome::Empty => writeln!(out, "No clients to back up.")?,
    BackupOutcome::Written { path, records } => writeln!(
      out,
      "Backup of {records} client(s) written to {}.",
      path.display()
    )?,
  }
  Ok(())
}

fn categories(out: &mut dyn Write) -> anyhow::Result<()> {
  for category in CaseCategory::all() {
    writeln!(out, "{category}")?;
    for case_type in category.case_types() {
      writeln!(out, "  - {case_type}")?;
    }
  }
  Ok(())
}

// ─── Rendering ───────────────────────────────────────────────────────────────

fn print_clients(
  clients: &[Client],
  json: bool,
  out: &mut dyn Write,
) -> anyhow::Result<()> {
  if json {
    writeln!(out, "{}", serde_json::to_string_pretty(clients)?)?;
    return Ok(());
  }

  for (i, c) in clients.iter().enumerate() {
    if i > 0 {
      writeln!(out)?;
    }
    let age = c.age.map_or_else(|| "N/A".to_owned(), |a| a.to_string());
    let registered = c.registered_at_display().unwrap_or_else(|| "N/A".to_owned());

    writeln!(out, "ID:         {}", c.id)?;
    writeln!(out, "First name: {}", c.first_name)?;
    writeln!(out, "Last name:  {}", c.last_name)?;
    writeln!(out, "Age:        {age}")?;
    writeln!(out, "Email:      {}", c.email)?;
    writeln!(out, "Phone:      {}", c.phone)?;
    writeln!(out, "Category:   {}", c.category)?;
    writeln!(out, "Case type:  {}", c.case_type)?;
    writeln!(out, "Registered: {registered}")?;
  }
  Ok(())
}
