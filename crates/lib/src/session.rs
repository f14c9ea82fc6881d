//! Per-invocation session state.
//!
//! A [`Session`] is built once the command line has been parsed and lives for
//! the rest of the invocation. Target bodies receive it as their only argument
//! (as a read-only userdata when the body is a Lua function).

use mlua::prelude::*;
use serde::Serialize;

use crate::logging::LogLevel;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
  Quiet,
  #[default]
  Normal,
  Verbose,
}

impl Verbosity {
  /// Combine the `--quiet` and `--verbose` flags. Both set is not a valid combination.
  pub fn from_flags(quiet: bool, verbose: bool) -> Option<Self> {
    match (quiet, verbose) {
      (true, true) => None,
      (true, false) => Some(Verbosity::Quiet),
      (false, true) => Some(Verbosity::Verbose),
      (false, false) => Some(Verbosity::Normal),
    }
  }

  pub fn log_level(self) -> LogLevel {
    match self {
      Verbosity::Quiet => LogLevel::Error,
      Verbosity::Normal => LogLevel::Warn,
      Verbosity::Verbose => LogLevel::Debug,
    }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
  #[default]
  Run,
  /// Load and resolve only; no target body runs.
  InitOnly,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
  pub verbosity: Verbosity,
  pub mode: Mode,
  /// The selected target, filled in once selection has happened.
  pub target: Option<String>,
}

impl Session {
  pub fn new(verbosity: Verbosity, mode: Mode) -> Self {
    Self {
      verbosity,
      mode,
      target: None,
    }
  }

  pub fn is_quiet(&self) -> bool {
    self.verbosity == Verbosity::Quiet
  }

  pub fn is_verbose(&self) -> bool {
    self.verbosity == Verbosity::Verbose
  }

  pub fn is_init_only(&self) -> bool {
    self.mode == Mode::InitOnly
  }
}

impl LuaUserData for Session {
  fn add_fields<F: LuaUserDataFields<Self>>(fields: &mut F) {
    fields.add_field_method_get("quiet", |_, this| Ok(this.is_quiet()));
    fields.add_field_method_get("verbose", |_, this| Ok(this.is_verbose()));
    fields.add_field_method_get("init_only", |_, this| Ok(this.is_init_only()));
    fields.add_field_method_get("target", |_, this| Ok(this.target.clone()));
  }
}
