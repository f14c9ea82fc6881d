//! Implementation of a `trestle [TARGET|help]` invocation.
//!
//! Hands the parsed arguments to the library dispatcher, then reports the
//! outcome in the requested format and maps it to a process exit code.

use std::process::ExitCode;
use std::rc::Rc;

use anyhow::Result;
use serde::Serialize;
use tracing::debug;
use trestle_lib::logging::LevelControl;
use trestle_lib::{Args, DispatchError, Dispatcher, ErrorKind, Outcome, Stage};

use super::print_help_listing;
use crate::output::{format_duration, print_error, print_info, print_json, print_stat, print_success, symbols};

/// Run one invocation and return the exit code for the process.
pub fn cmd_run(args: &Args, levels: Rc<dyn LevelControl>) -> ExitCode {
  debug!(file = ?args.file, target_name = ?args.target, "starting invocation");
  let mut dispatcher = Dispatcher::with_level_control(levels);

  match dispatcher.invoke_with(args) {
    Ok(outcome) => match report_outcome(args, &outcome) {
      Ok(()) => ExitCode::SUCCESS,
      Err(err) => {
        print_error(&format!("{:#}", err));
        ExitCode::FAILURE
      }
    },
    Err(err) => {
      report_error(args, &err);
      exit_code(err.exit_code())
    }
  }
}

fn exit_code(code: i32) -> ExitCode {
  ExitCode::from(u8::try_from(code).unwrap_or(1))
}

fn report_outcome(args: &Args, outcome: &Outcome) -> Result<()> {
  if args.format.is_json() {
    return print_json(outcome);
  }

  let quiet = args.quiet;
  match outcome {
    Outcome::Help { targets } => print_help_listing(targets),
    Outcome::InitOnly { target, plan } if !quiet => {
      print_info(&format!(
        "'{}' resolves to: {}",
        target,
        plan.join(&format!(" {} ", symbols::ARROW))
      ));
    }
    Outcome::Executed { target, summary } if !quiet => {
      if let Some(halted_by) = &summary.halted_by {
        print_info(&format!("'{}' stopped the run early", halted_by));
      }
      print_success(&format!(
        "{} ({} target(s) in {})",
        target,
        summary.completed.len(),
        format_duration(summary.total_elapsed())
      ));
      if args.verbose {
        for completed in &summary.completed {
          print_stat(&completed.name, &format_duration(completed.elapsed));
        }
      }
    }
    _ => {}
  }
  Ok(())
}

#[derive(Serialize)]
struct ErrorReport<'a> {
  error: String,
  kind: ErrorKind,
  stage: Stage,
  exit_code: i32,
  #[serde(skip_serializing_if = "Option::is_none")]
  target: Option<&'a str>,
}

fn report_error(args: &Args, err: &DispatchError) {
  let target = match err {
    DispatchError::Execute(err) => Some(err.target()),
    _ => None,
  };

  if args.format.is_json() {
    let report = ErrorReport {
      error: err.to_string(),
      kind: err.kind(),
      stage: err.stage(),
      exit_code: err.exit_code(),
      target,
    };
    if print_json(&report).is_ok() {
      return;
    }
  }

  // A requested exit is not a failure worth shouting about
  if err.kind() == ErrorKind::Exit && !args.verbose {
    return;
  }

  print_error(&err.to_string());
  if args.verbose {
    print_stat("stage", err.stage().as_str());
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
      print_stat("caused by", &cause.to_string());
      source = cause.source();
    }
  }
}

