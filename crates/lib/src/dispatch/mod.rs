//! The invocation state machine.
//!
//! ```text
//! Init -> Load -> Resolve -> Execute -> Done
//!                        \-> StopInitOnly
//! ```
//!
//! Every stage can fail; the resulting [`DispatchError`] reports the stage,
//! an [`ErrorKind`] and the process exit code. Nothing in here terminates
//! the process.
//!
//! # Submodules
//!
//! - [`args`] - Command-line arguments
//! - [`types`] - Stages, outcomes and errors

mod args;
mod types;

use std::rc::Rc;

use clap::Parser;
use tracing::{debug, warn};

use crate::config;
use crate::eval::{LoadError, evaluate_definitions};
use crate::execute::execute;
use crate::logging::{LevelControl, NullLevelControl};
use crate::registry::TargetRegistry;
use crate::resolve::resolve;
use crate::session::Session;

pub use args::{Args, OutputFormat};
pub use types::{DispatchError, ErrorKind, Outcome, Stage};

/// Drives invocations against an owned [`TargetRegistry`].
///
/// Targets registered directly on the dispatcher (through
/// [`Dispatcher::registry_mut`]) are merged before the loaded definitions.
/// The registry is emptied at the end of every invocation, successful or not.
pub struct Dispatcher {
  registry: TargetRegistry,
  levels: Rc<dyn LevelControl>,
}

impl Default for Dispatcher {
  fn default() -> Self {
    Self::new()
  }
}

impl Dispatcher {
  pub fn new() -> Self {
    Self::with_level_control(Rc::new(NullLevelControl))
  }

  /// Use `levels` to apply `--quiet`/`--verbose` and `trestle.log.set_level()`.
  pub fn with_level_control(levels: Rc<dyn LevelControl>) -> Self {
    Self {
      registry: TargetRegistry::new(),
      levels,
    }
  }

  pub fn registry(&self) -> &TargetRegistry {
    &self.registry
  }

  pub fn registry_mut(&mut self) -> &mut TargetRegistry {
    &mut self.registry
  }

  /// Forget every registered target.
  pub fn reset(&mut self) {
    self.registry.clear();
  }

  /// Parse `args` (without the program name) and run one invocation.
  pub fn invoke<I, S>(&mut self, args: I) -> Result<Outcome, DispatchError>
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let argv = std::iter::once("trestle".to_string()).chain(args.into_iter().map(Into::into));
    let args = Args::try_parse_from(argv).inspect_err(|_| self.reset())?;
    self.invoke_with(&args)
  }

  /// Run one invocation with already parsed arguments.
  pub fn invoke_with(&mut self, args: &Args) -> Result<Outcome, DispatchError> {
    let result = self.run(args);
    self.reset();

    match &result {
      Ok(_) => debug!(stage = %Stage::Done, "invocation finished"),
      Err(err) => debug!(stage = %err.stage(), kind = ?err.kind(), "invocation failed"),
    }
    result
  }

  fn run(&mut self, args: &Args) -> Result<Outcome, DispatchError> {
    debug!(stage = %Stage::Init, "starting invocation");
    let mut session = args.session()?;

    debug!(stage = %Stage::Load, "loading definitions");
    let path = config::definitions_path(args.file.as_deref())?;
    let mut definitions = match evaluate_definitions(&path, self.levels.clone()) {
      Ok(definitions) => definitions,
      Err(LoadError::Exited { code: 0 }) => {
        debug!("definitions requested exit with code 0");
        return Ok(Outcome::Stopped);
      }
      Err(err) => return Err(err.into()),
    };

    let loaded = definitions.take_registry();
    let outcome = self.run_loaded(args, &mut session, loaded);

    // Bodies hold functions owned by the definitions runtime
    self.registry.clear();
    drop(definitions);
    outcome
  }

  fn run_loaded(
    &mut self,
    args: &Args,
    session: &mut Session,
    mut loaded: TargetRegistry,
  ) -> Result<Outcome, DispatchError> {
    for def in loaded.drain() {
      self
        .registry
        .insert_shared(def)
        .map_err(|err| DispatchError::Load(LoadError::Registry(err)))?;
    }

    if args.is_help() {
      let targets = self.registry.all().map(|def| def.summary()).collect();
      return Ok(Outcome::Help { targets });
    }

    debug!(stage = %Stage::Resolve, "selecting target");
    let requested = match args.target.as_deref() {
      Some(name) => self.registry.lookup(name)?,
      None => self.registry.effective_default()?.ok_or(DispatchError::NoTarget)?,
    };
    session.target = Some(requested.name.clone());

    let plan = resolve(&requested, &self.registry)?;

    if session.is_init_only() {
      debug!(stage = %Stage::StopInitOnly, plan = ?plan.names(), "init-only, not executing");
      return Ok(Outcome::InitOnly {
        target: requested.name.clone(),
        plan: plan.names(),
      });
    }

    debug!(stage = %Stage::Execute, "executing");
    if let Err(err) = self.levels.set_level(session.verbosity.log_level()) {
      warn!(error = %err, "could not apply verbosity to logging");
    }
    let summary = execute(&plan, session)?;

    Ok(Outcome::Executed {
      target: requested.name.clone(),
      summary,
    })
  }
}
