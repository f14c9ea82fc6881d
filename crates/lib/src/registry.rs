//! The target registry.
//!
//! Maps target names to their definitions, preserving registration order for
//! `help` listings. A registry belongs to a single invocation: the dispatcher
//! clears it when the invocation ends so that a process driving several
//! invocations never sees stale names or stale defaults.

use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, trace};

use crate::consts::HELP_TARGET;
use crate::target::{TargetBody, TargetDef};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
  /// A target with the same name is already registered.
  #[error("duplicate target '{name}' (declared at {first}, redeclared at {second})")]
  DuplicateTarget { name: String, first: String, second: String },

  /// No target with this name is registered.
  #[error("unknown target '{name}'")]
  UnknownTarget { name: String },

  /// More than one target is marked as the default.
  #[error("more than one default target: {}", names.join(", "))]
  AmbiguousDefault { names: Vec<String> },

  /// The name collides with a built-in command.
  #[error("'{name}' is reserved and cannot be used as a target name")]
  ReservedName { name: String },
}

#[derive(Debug, Default)]
pub struct TargetRegistry {
  targets: Vec<Rc<TargetDef>>,
  index: HashMap<String, usize>,
}

impl TargetRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a new target.
  ///
  /// Fails with [`RegistryError::DuplicateTarget`] if the name is taken; the
  /// existing definition is left untouched.
  pub fn register<I, S>(
    &mut self,
    name: impl Into<String>,
    body: TargetBody,
    requires: I,
    is_default: bool,
  ) -> Result<Rc<TargetDef>, RegistryError>
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let def = TargetDef::new(name, body)
      .with_requires(requires)
      .with_default(is_default);
    self.insert(def)
  }

  /// Register a fully built definition.
  pub fn insert(&mut self, def: TargetDef) -> Result<Rc<TargetDef>, RegistryError> {
    self.insert_shared(Rc::new(def))
  }

  /// Register a definition that may already be shared with another registry.
  pub fn insert_shared(&mut self, def: Rc<TargetDef>) -> Result<Rc<TargetDef>, RegistryError> {
    if def.name == HELP_TARGET {
      return Err(RegistryError::ReservedName { name: def.name.clone() });
    }

    if let Some(&existing) = self.index.get(&def.name) {
      return Err(RegistryError::DuplicateTarget {
        name: def.name.clone(),
        first: self.targets[existing].declared_at.clone(),
        second: def.declared_at.clone(),
      });
    }

    trace!(name = %def.name, requires = ?def.requires, default = def.is_default, "registering target");
    self.index.insert(def.name.clone(), self.targets.len());
    self.targets.push(def.clone());
    Ok(def)
  }

  pub fn lookup(&self, name: &str) -> Result<Rc<TargetDef>, RegistryError> {
    self
      .index
      .get(name)
      .map(|&i| self.targets[i].clone())
      .ok_or_else(|| RegistryError::UnknownTarget { name: name.to_string() })
  }

  pub fn contains(&self, name: &str) -> bool {
    self.index.contains_key(name)
  }

  /// The target marked as default, if exactly one is.
  ///
  /// Several defaults are an error rather than a first- or last-wins choice.
  pub fn effective_default(&self) -> Result<Option<Rc<TargetDef>>, RegistryError> {
    let mut defaults = self.targets.iter().filter(|t| t.is_default);
    let Some(first) = defaults.next() else {
      return Ok(None);
    };

    let rest: Vec<&Rc<TargetDef>> = defaults.collect();
    if rest.is_empty() {
      return Ok(Some(first.clone()));
    }

    let mut names = vec![first.name.clone()];
    names.extend(rest.iter().map(|t| t.name.clone()));
    Err(RegistryError::AmbiguousDefault { names })
  }

  /// All targets in registration order.
  pub fn all(&self) -> impl Iterator<Item = &Rc<TargetDef>> {
    self.targets.iter()
  }

  pub fn names(&self) -> Vec<&str> {
    self.targets.iter().map(|t| t.name.as_str()).collect()
  }

  pub fn len(&self) -> usize {
    self.targets.len()
  }

  pub fn is_empty(&self) -> bool {
    self.targets.is_empty()
  }

  /// Remove every target, returning them in registration order.
  pub fn drain(&mut self) -> Vec<Rc<TargetDef>> {
    self.index.clear();
    std::mem::take(&mut self.targets)
  }

  pub fn clear(&mut self) {
    if !self.targets.is_empty() {
      debug!(count = self.targets.len(), "clearing target registry");
    }
    self.targets.clear();
    self.index.clear();
  }
}
