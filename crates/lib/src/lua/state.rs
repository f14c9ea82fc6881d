//! State shared between Rust and the Lua callbacks of one definitions file.

use std::cell::RefCell;
use std::rc::Rc;

use crate::registry::{RegistryError, TargetRegistry};

#[derive(Debug, Default)]
pub struct ScriptState {
  /// Targets declared so far.
  pub registry: TargetRegistry,
  /// First registration failure, kept even if the script catches the Lua error.
  pub registration_error: Option<RegistryError>,
  /// Set once loading has finished; later declarations are rejected.
  pub sealed: bool,
  /// Exit code requested through `trestle.exit()`, consumed by whoever ran the script.
  pub exit_request: Option<i32>,
}

pub type SharedState = Rc<RefCell<ScriptState>>;

impl ScriptState {
  pub fn shared() -> SharedState {
    Rc::new(RefCell::new(Self::default()))
  }

  /// Record a registration failure, keeping the first one.
  pub fn record_error(&mut self, err: &RegistryError) {
    if self.registration_error.is_none() {
      self.registration_error = Some(err.clone());
    }
  }
}
