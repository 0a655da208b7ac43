//! Line-oriented interactive mode. Every line is parsed with the same
//! subcommands as one-shot mode, plus `history` and `exit`.

use std::io::{BufRead, Write};

use anyhow::bail;
use clap::{Parser, Subcommand};
use legajo_core::session::{Action, SessionLog};

use crate::{
  cli::Command,
  commands::{self, Context},
};

#[derive(Parser, Debug)]
#[command(name = "legajo", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
  #[command(subcommand)]
  command: ShellCommand,
}

#[derive(Subcommand, Debug)]
enum ShellCommand {
  #[command(flatten)]
  Registry(Command),
  /// Show what was done in this session.
  History,
  /// Leave the shell.
  #[command(alias = "quit")]
  Exit,
}

/// Read commands from `input` until `exit` or end of input. A failing command
/// is reported and the loop carries on.
pub fn run(
  ctx: &Context,
  log: &mut SessionLog,
  mut input: impl BufRead,
  out: &mut dyn Write,
) -> anyhow::Result<()> {
  let mut line = String::new();
  loop {
    write!(out, "legajo> ")?;
    out.flush()?;

    line.clear();
    if input.read_line(&mut line)? == 0 {
      writeln!(out)?;
      break;
    }

    let words = match split_words(&line) {
      Ok(w) if w.is_empty() => continue,
      Ok(w) => w,
      Err(e) => {
        writeln!(out, "error: {e}")?;
        continue;
      }
    };

    let parsed = match ShellLine::try_parse_from(words) {
      Ok(p) => p,
      Err(e) => {
        write!(out, "{}", e.render())?;
        continue;
      }
    };

    match parsed.command {
      ShellCommand::Exit => break,
      ShellCommand::History => {
        log.record(Action::ShowHistory);
        for entry in log.entries() {
          writeln!(out, "{entry}")?;
        }
      }
      ShellCommand::Registry(Command::Shell) => {
        writeln!(out, "error: already inside the shell")?;
      }
      ShellCommand::Registry(command) => {
        if let Err(e) = commands::run(command, ctx, log, out) {
          writeln!(out, "error: {e:#}")?;
        }
      }
    }
  }

  tracing::debug!(actions = log.len(), "shell closed");
  Ok(())
}

/// Split a line on whitespace, keeping double-quoted runs together.
fn split_words(line: &str) -> anyhow::Result<Vec<String>> {
  let mut words = Vec::new();
  let mut current = String::new();
  let mut in_word = false;
  let mut quoted = false;

  for ch in line.chars() {
    match ch {
      '"' => {
        quoted = !quoted;
        in_word = true;
      }
      c if c.is_whitespace() && !quoted => {
        if in_word {
          words.push(std::mem::take(&mut current));
          in_word = false;
        }
      }
      c => {
        current.push(c);
        in_word = true;
      }
    }
  }

  if quoted {
    bail!("unterminated quote");
  }
  if in_word {
    words.push(current);
  }
  Ok(words)
}
