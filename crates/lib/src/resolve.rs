//! Dependency resolution.
//!
//! Turns a requested target into a [`Plan`]: every target it transitively
//! requires, each exactly once, prerequisites before dependents.
//!
//! # Algorithm
//!
//! Depth-first traversal from the requested target. Prerequisites are visited
//! in the order they were declared, then the target itself is appended. A
//! target is appended on its first completed visit only. Targets still on the
//! traversal stack are in progress; reaching one of them again is a cycle.
//!
//! Declaration order is the only tie-break between siblings, so the same
//! registry always yields the same plan.

use std::collections::HashSet;
use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, trace};

use crate::registry::TargetRegistry;
use crate::target::TargetDef;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
  /// A target transitively requires itself. `cycle` starts and ends with the same name.
  #[error("dependency cycle detected: {}", cycle.join(" -> "))]
  CyclicDependency { cycle: Vec<String> },

  /// A prerequisite is not registered.
  #[error("target '{required_by}' requires unknown target '{name}'")]
  UnknownTarget { name: String, required_by: String },
}

/// An ordered, duplicate-free sequence of targets to execute.
#[derive(Debug, Clone, Default)]
pub struct Plan {
  targets: Vec<Rc<TargetDef>>,
}

impl Plan {
  pub fn names(&self) -> Vec<String> {
    self.targets.iter().map(|t| t.name.clone()).collect()
  }

  pub fn iter(&self) -> impl Iterator<Item = &Rc<TargetDef>> {
    self.targets.iter()
  }

  pub fn len(&self) -> usize {
    self.targets.len()
  }

  pub fn is_empty(&self) -> bool {
    self.targets.is_empty()
  }

  /// The requested target, which is always last.
  pub fn requested(&self) -> Option<&Rc<TargetDef>> {
    self.targets.last()
  }
}

impl<'a> IntoIterator for &'a Plan {
  type Item = &'a Rc<TargetDef>;
  type IntoIter = std::slice::Iter<'a, Rc<TargetDef>>;

  fn into_iter(self) -> Self::IntoIter {
    self.targets.iter()
  }
}

/// Compute the execution plan for `requested`.
pub fn resolve(requested: &Rc<TargetDef>, registry: &TargetRegistry) -> Result<Plan, ResolveError> {
  let mut walk = Walk {
    registry,
    done: HashSet::new(),
    stack: Vec::new(),
    order: Vec::new(),
  };
  walk.visit(requested)?;

  let plan = Plan { targets: walk.order };
  debug!(target_name = %requested.name, plan = ?plan.names(), "resolved plan");
  Ok(plan)
}

struct Walk<'r> {
  registry: &'r TargetRegistry,
  done: HashSet<String>,
  /// Targets currently being visited, outermost first.
  stack: Vec<String>,
  order: Vec<Rc<TargetDef>>,
}

impl Walk<'_> {
  fn visit(&mut self, def: &Rc<TargetDef>) -> Result<(), ResolveError> {
    if self.done.contains(&def.name) {
      return Ok(());
    }

    if let Some(start) = self.stack.iter().position(|name| *name == def.name) {
      let mut cycle = self.stack[start..].to_vec();
      cycle.push(def.name.clone());
      return Err(ResolveError::CyclicDependency { cycle });
    }

    self.stack.push(def.name.clone());
    for required in &def.requires {
      let dep = self
        .registry
        .lookup(required)
        .map_err(|_| ResolveError::UnknownTarget {
          name: required.clone(),
          required_by: def.name.clone(),
        })?;
      trace!(target_name = %def.name, requires = %dep.name, "visiting prerequisite");
      self.visit(&dep)?;
    }
    self.stack.pop();

    self.done.insert(def.name.clone());
    self.order.push(def.clone());
    Ok(())
  }
}
