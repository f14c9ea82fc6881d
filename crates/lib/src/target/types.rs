use std::fmt;
use std::rc::Rc;

use mlua::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::session::Session;

/// Marker stored in the `__type` metatable field of target handles.
pub const TARGET_REF_TYPE: &str = "TargetRef";

/// Marker for `trestle.target{}` specs that have not been given a name yet.
pub const TARGET_SPEC_TYPE: &str = "TargetSpec";

/// Errors raised by a target body.
#[derive(Debug, Error)]
pub enum BodyError {
  /// The body reported a failure.
  #[error("{0}")]
  Failed(String),

  /// The Lua function behind the body raised an error.
  #[error("lua error: {0}")]
  Lua(#[from] LuaError),

  /// The body asked for the invocation to terminate with an exit code.
  #[error("exit requested with code {0}")]
  Exit(i32),
}

impl BodyError {
  pub fn failed(message: impl Into<String>) -> Self {
    BodyError::Failed(message.into())
  }
}

pub type BodyResult = Result<(), BodyError>;

/// The invokable part of a target.
///
/// Bodies are stored at registration time and only called by the executor.
#[derive(Clone)]
pub struct TargetBody(Rc<dyn Fn(&Session) -> BodyResult>);

impl TargetBody {
  pub fn new(f: impl Fn(&Session) -> BodyResult + 'static) -> Self {
    Self(Rc::new(f))
  }

  /// A body that does nothing; useful for grouping targets.
  pub fn noop() -> Self {
    Self::new(|_| Ok(()))
  }

  pub fn call(&self, session: &Session) -> BodyResult {
    (self.0)(session)
  }
}

impl fmt::Debug for TargetBody {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("TargetBody(..)")
  }
}

#[derive(Debug, Clone)]
pub struct TargetDef {
  pub name: String,
  pub body: TargetBody,
  /// Prerequisite names, in declaration order.
  pub requires: Vec<String>,
  pub is_default: bool,
  /// One-line description shown by `help`.
  pub help: Option<String>,
  /// Where the target was declared (a file path, or `<rust>` for embedded targets).
  pub declared_at: String,
}

impl TargetDef {
  pub fn new(name: impl Into<String>, body: TargetBody) -> Self {
    Self {
      name: name.into(),
      body,
      requires: Vec::new(),
      is_default: false,
      help: None,
      declared_at: "<rust>".to_string(),
    }
  }

  pub fn with_requires<I, S>(mut self, requires: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.requires = requires.into_iter().map(Into::into).collect();
    self
  }

  pub fn with_default(mut self, is_default: bool) -> Self {
    self.is_default = is_default;
    self
  }

  pub fn with_help(mut self, help: impl Into<String>) -> Self {
    self.help = Some(help.into());
    self
  }

  pub fn declared_at(mut self, location: impl Into<String>) -> Self {
    self.declared_at = location.into();
    self
  }

  pub fn summary(&self) -> TargetSummary {
    TargetSummary {
      name: self.name.clone(),
      help: self.help.clone(),
      requires: self.requires.clone(),
      default: self.is_default,
    }
  }
}

/// Serializable view of a target for `help` listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetSummary {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub help: Option<String>,
  pub requires: Vec<String>,
  pub default: bool,
}
