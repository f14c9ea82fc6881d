use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::eval::LoadError;
use crate::execute::{ExecuteError, ExecutionSummary};
use crate::registry::RegistryError;
use crate::resolve::ResolveError;
use crate::target::TargetSummary;

/// Steps of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
  Init,
  Load,
  Resolve,
  Execute,
  StopInitOnly,
  Done,
}

impl Stage {
  pub fn as_str(self) -> &'static str {
    match self {
      Stage::Init => "init",
      Stage::Load => "load",
      Stage::Resolve => "resolve",
      Stage::Execute => "execute",
      Stage::StopInitOnly => "stop-init-only",
      Stage::Done => "done",
    }
  }
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Coarse classification of a [`DispatchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
  Usage,
  Load,
  DuplicateTarget,
  UnknownTarget,
  AmbiguousDefault,
  CyclicDependency,
  Execution,
  Exit,
}

#[derive(Debug, Error)]
pub enum DispatchError {
  #[error(transparent)]
  Cli(#[from] clap::Error),

  #[error("{0}")]
  Usage(String),

  /// No target was named and none is marked as default.
  #[error("no target to run: name one or mark a target with `default = true` (try `help`)")]
  NoTarget,

  #[error(transparent)]
  Load(#[from] LoadError),

  #[error(transparent)]
  Registry(#[from] RegistryError),

  #[error(transparent)]
  Resolve(#[from] ResolveError),

  #[error(transparent)]
  Execute(#[from] ExecuteError),
}

impl DispatchError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      DispatchError::Cli(_) | DispatchError::Usage(_) | DispatchError::NoTarget => ErrorKind::Usage,
      DispatchError::Load(LoadError::Registry(err)) | DispatchError::Registry(err) => registry_kind(err),
      DispatchError::Load(LoadError::Exited { .. }) => ErrorKind::Exit,
      DispatchError::Load(_) => ErrorKind::Load,
      DispatchError::Resolve(ResolveError::CyclicDependency { .. }) => ErrorKind::CyclicDependency,
      DispatchError::Resolve(ResolveError::UnknownTarget { .. }) => ErrorKind::UnknownTarget,
      DispatchError::Execute(ExecuteError::Exited { .. }) => ErrorKind::Exit,
      DispatchError::Execute(_) => ErrorKind::Execution,
    }
  }

  /// Process exit code: 2 for usage errors, the requested code for
  /// `trestle.exit(n)`, 1 for everything else.
  pub fn exit_code(&self) -> i32 {
    match self {
      DispatchError::Cli(err) => err.exit_code(),
      DispatchError::Load(LoadError::Exited { code }) | DispatchError::Execute(ExecuteError::Exited { code, .. }) => {
        *code
      }
      _ if self.kind() == ErrorKind::Usage => 2,
      _ => 1,
    }
  }

  /// The stage the invocation was in when this error occurred.
  pub fn stage(&self) -> Stage {
    match self {
      DispatchError::Cli(_) | DispatchError::Usage(_) => Stage::Init,
      DispatchError::Load(_)
      | DispatchError::Registry(RegistryError::DuplicateTarget { .. } | RegistryError::ReservedName { .. }) => {
        Stage::Load
      }
      // Target selection happens at the start of resolution
      DispatchError::Registry(_) | DispatchError::NoTarget | DispatchError::Resolve(_) => Stage::Resolve,
      DispatchError::Execute(_) => Stage::Execute,
    }
  }

  /// Whether this is clap's `--help` or `--version` output rather than a failure.
  pub fn is_informational(&self) -> bool {
    matches!(
      self,
      DispatchError::Cli(err) if matches!(
        err.kind(),
        clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
      )
    )
  }
}

fn registry_kind(err: &RegistryError) -> ErrorKind {
  match err {
    RegistryError::DuplicateTarget { .. } | RegistryError::ReservedName { .. } => ErrorKind::DuplicateTarget,
    RegistryError::UnknownTarget { .. } => ErrorKind::UnknownTarget,
    RegistryError::AmbiguousDefault { .. } => ErrorKind::AmbiguousDefault,
  }
}

/// What a successful invocation did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum Outcome {
  /// `help`: the registered targets, in registration order.
  Help { targets: Vec<TargetSummary> },
  /// `--init-only`: the plan that would have run.
  InitOnly { target: String, plan: Vec<String> },
  /// The plan ran.
  Executed { target: String, summary: ExecutionSummary },
  /// The definitions file called `trestle.exit(0)` while loading.
  Stopped,
}
