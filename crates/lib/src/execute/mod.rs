//! Plan execution.
//!
//! Runs the bodies of a resolved [`Plan`] strictly in order, one at a time.
//! The first failing body stops execution; targets after it in the plan are
//! never attempted, whether or not they depend on the failed one.

mod types;

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::resolve::Plan;
use crate::session::Session;
use crate::target::BodyError;

pub use types::{CompletedTarget, ExecuteError, ExecutionSummary};

/// Execute every target in `plan` exactly once.
///
/// A body returning [`BodyError::Exit`] with code 0 ends the plan early but
/// successfully; any other exit code, or any other error, is returned as an
/// [`ExecuteError`] naming the target.
pub fn execute(plan: &Plan, session: &Session) -> Result<ExecutionSummary, ExecuteError> {
  info!(count = plan.len(), "executing plan");
  let mut summary = ExecutionSummary::default();

  for target in plan {
    debug!(target_name = %target.name, "running target");
    let started = Instant::now();
    let result = target.body.call(session);
    let elapsed = started.elapsed();

    match result {
      Ok(()) => {
        debug!(target_name = %target.name, elapsed_ms = elapsed.as_millis() as u64, "target finished");
        summary.completed.push(CompletedTarget {
          name: target.name.clone(),
          elapsed,
        });
      }
      Err(BodyError::Exit(0)) => {
        info!(target_name = %target.name, "target requested exit, stopping plan");
        summary.completed.push(CompletedTarget {
          name: target.name.clone(),
          elapsed,
        });
        summary.halted_by = Some(target.name.clone());
        return Ok(summary);
      }
      Err(BodyError::Exit(code)) => {
        warn!(target_name = %target.name, code, "target requested exit");
        return Err(ExecuteError::Exited {
          target: target.name.clone(),
          code,
        });
      }
      Err(source) => {
        warn!(target_name = %target.name, error = %source, "target failed");
        return Err(ExecuteError::TargetFailed {
          target: target.name.clone(),
          source,
        });
      }
    }
  }

  Ok(summary)
}
