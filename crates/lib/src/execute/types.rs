//! Types for plan execution.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::target::BodyError;

/// Errors that stop a plan.
#[derive(Debug, Error)]
pub enum ExecuteError {
  /// A body failed. The rest of the plan was not attempted.
  #[error("target '{target}' failed: {source}")]
  TargetFailed {
    target: String,
    #[source]
    source: BodyError,
  },

  /// A body asked to terminate with a nonzero code.
  #[error("target '{target}' exited with code {code}")]
  Exited { target: String, code: i32 },
}

impl ExecuteError {
  /// Name of the target that stopped the plan.
  pub fn target(&self) -> &str {
    match self {
      ExecuteError::TargetFailed { target, .. } | ExecuteError::Exited { target, .. } => target,
    }
  }
}

/// A target whose body returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedTarget {
  pub name: String,
  #[serde(with = "duration_millis")]
  pub elapsed: Duration,
}

/// Result of a successful plan execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionSummary {
  pub completed: Vec<CompletedTarget>,
  /// Set when a body requested exit code 0 before the plan finished.
  pub halted_by: Option<String>,
}

impl ExecutionSummary {
  pub fn names(&self) -> Vec<&str> {
    self.completed.iter().map(|t| t.name.as_str()).collect()
  }

  pub fn total_elapsed(&self) -> Duration {
    self.completed.iter().map(|t| t.elapsed).sum()
  }
}

mod duration_millis {
  use std::time::Duration;

  use serde::Serializer;

  pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
  }
}
