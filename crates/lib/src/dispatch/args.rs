//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Serialize;

use crate::consts::HELP_TARGET;
use crate::session::{Mode, Session, Verbosity};

use super::DispatchError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

/// trestle - run targets declared in a Lua definitions file
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "trestle", version)]
pub struct Args {
  /// Definitions file (default: $TRESTLE_FILE, then trestle.lua or .trestle.lua)
  #[arg(short, long, value_name = "PATH")]
  pub file: Option<PathBuf>,

  /// Only report errors
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Show debug output
  #[arg(short, long)]
  pub verbose: bool,

  /// Load and resolve, but do not run any target
  #[arg(long)]
  pub init_only: bool,

  /// Output format for listings and results
  #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
  pub format: OutputFormat,

  /// Target to run, or `help` to list targets (default: the default target)
  #[arg(value_name = "TARGET")]
  pub target: Option<String>,
}

impl Args {
  /// Build the session for these arguments.
  ///
  /// Fails when both `quiet` and `verbose` are set, which clap already
  /// rejects when parsing but a hand-built `Args` may still carry.
  pub fn session(&self) -> Result<Session, DispatchError> {
    let verbosity = Verbosity::from_flags(self.quiet, self.verbose)
      .ok_or_else(|| DispatchError::Usage("--quiet and --verbose cannot be used together".to_string()))?;
    let mode = if self.init_only { Mode::InitOnly } else { Mode::Run };
    Ok(Session::new(verbosity, mode))
  }

  /// Whether the positional argument asks for the target listing.
  pub fn is_help(&self) -> bool {
    self.target.as_deref() == Some(HELP_TARGET)
  }
}
