//! Command-line definitions shared by one-shot mode and the interactive shell.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use legajo_core::{
  case::{CaseCategory, CaseType},
  validate::{MAX_AGE, MIN_AGE, is_valid_age, parse_integer},
};

#[derive(Parser, Debug)]
#[command(name = "legajo", version, about = "Client registry for a small legal office")]
pub struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "legajo.toml")]
  pub config: PathBuf,

  /// Print records as JSON instead of text.
  #[arg(long, global = true)]
  pub json: bool,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Register a new client.
  Add(AddArgs),
  /// Look a client up by id or email.
  Show(ShowArgs),
  /// Change a client's details; omitted fields keep their value.
  Update(UpdateArgs),
  /// Remove a client permanently.
  Delete(DeleteArgs),
  /// List every client (requires the admin secret).
  List(ListArgs),
  /// List the clients whose case falls under a category.
  ByCategory {
    category: CaseCategory,
  },
  /// Write the plain-text backup (requires the admin secret).
  Backup {
    #[arg(long)]
    secret: String,
  },
  /// Show the categories and their case types.
  Categories,
  /// Read commands from standard input until `exit`.
  Shell,
}

#[derive(Args, Debug)]
pub struct AddArgs {
  #[arg(long)]
  pub first_name: String,
  #[arg(long)]
  pub last_name:  String,
  #[arg(long, value_parser = parse_age)]
  pub age:        Option<u8>,
  #[arg(long)]
  pub email:      String,
  #[arg(long)]
  pub phone:      String,
  /// Defaults to the category the case type belongs to.
  #[arg(long)]
  pub category:   Option<CaseCategory>,
  #[arg(long)]
  pub case_type:  CaseType,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct ShowArgs {
  #[arg(long)]
  pub id:    Option<i64>,
  #[arg(long)]
  pub email: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
  pub id:         i64,
  #[arg(long)]
  pub first_name: Option<String>,
  #[arg(long)]
  pub last_name:  Option<String>,
  #[arg(long, value_parser = parse_age, conflicts_with = "clear_age")]
  pub age:        Option<u8>,
  /// Forget the recorded age.
  #[arg(long)]
  pub clear_age:  bool,
  #[arg(long)]
  pub email:      Option<String>,
  #[arg(long)]
  pub phone:      Option<String>,
  #[arg(long, requires = "case_type")]
  pub category:   Option<CaseCategory>,
  #[arg(long)]
  pub case_type:  Option<CaseType>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
  pub id:  i64,
  /// Skip the confirmation prompt.
  #[arg(short, long)]
  pub yes: bool,
}

#[derive(Args, Debug)]
pub struct ListArgs {
  #[arg(long)]
  pub secret: String,
  /// Only clients aged 18 or over.
  #[arg(long, conflicts_with = "minors")]
  pub adults: bool,
  /// Only clients under 18.
  #[arg(long)]
  pub minors: bool,
}

fn parse_age(s: &str) -> Result<u8, String> {
  match parse_integer(s) {
    Some(n) if is_valid_age(n) => u8::try_from(n).map_err(|e| e.to_string()),
    Some(_) => Err(format!("age must be between {MIN_AGE} and {MAX_AGE}")),
    None => Err(format!("{s:?} is not a whole number")),
  }
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory as _;

  use super::*;

  #[test]
  fn cli_definition_is_consistent() { Cli::command().debug_assert(); }

  #[test]
  fn add_accepts_case_type_slug() {
    let cli = Cli::try_parse_from([
      "legajo", "add", "--first-name", "Ana", "--last-name", "Gomez",
      "--email", "ana@x.com", "--phone", "1122334455",
      "--case-type", "accidente-de-trabajo",
    ])
    .unwrap();
    let Command::Add(args) = cli.command else { panic!("expected add") };
    assert_eq!(args.case_type, CaseType::AccidenteDeTrabajo);
    assert_eq!(args.category, None);
  }

  #[test]
  fn age_out_of_range_is_rejected() {
    assert!(parse_age("121").is_err());
    assert!(parse_age("abc").is_err());
    assert_eq!(parse_age(" 45 "), Ok(45));
  }

  #[test]
  fn show_needs_exactly_one_key() {
    assert!(Cli::try_parse_from(["legajo", "show"]).is_err());
    assert!(
      Cli::try_parse_from(["legajo", "show", "--id", "1", "--email", "a@b.com"])
        .is_err()
    );
    assert!(Cli::try_parse_from(["legajo", "show", "--email", "a@b.com"]).is_ok());
  }
}
