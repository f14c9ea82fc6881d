//! Definitions file evaluation.
//!
//! [`evaluate_definitions`] runs a Lua definitions file in a fresh runtime
//! and returns the targets it declared. The runtime is kept alive alongside
//! the targets because their bodies are Lua functions.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use mlua::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

use crate::logging::LevelControl;
use crate::lua::state::{ScriptState, SharedState};
use crate::lua::{loaders, runtime};
use crate::registry::{RegistryError, TargetRegistry};

#[derive(Debug, Error)]
pub enum LoadError {
  /// No definitions path was given and none of the default names exist.
  #[error("no definitions file found in {} (looked for {})", dir.display(), candidates.join(", "))]
  NotFound { dir: PathBuf, candidates: Vec<String> },

  /// The given definitions path does not exist.
  #[error("definitions file not found: {}", path.display())]
  Missing { path: PathBuf },

  #[error("cannot read definitions file {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("lua error: {0}")]
  Lua(#[from] LuaError),

  /// A declaration was rejected, even if the script caught the error.
  #[error(transparent)]
  Registry(#[from] RegistryError),

  /// The definitions file called `trestle.exit(code)` while loading.
  #[error("definitions requested exit with code {code}")]
  Exited { code: i32 },
}

/// Targets declared by a definitions file, plus the runtime their bodies live in.
pub struct Definitions {
  pub path: PathBuf,
  registry: TargetRegistry,
  // Bodies reach the state through weak references to report trestle.exit()
  _state: SharedState,
  _lua: Lua,
}

impl Definitions {
  pub fn registry(&self) -> &TargetRegistry {
    &self.registry
  }

  /// Move the declared targets out, leaving an empty registry behind.
  pub fn take_registry(&mut self) -> TargetRegistry {
    std::mem::take(&mut self.registry)
  }
}

impl std::fmt::Debug for Definitions {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Definitions")
      .field("path", &self.path)
      .field("targets", &self.registry.names())
      .finish_non_exhaustive()
  }
}

/// Evaluate the definitions file at `path`.
///
/// Every call uses a new Lua runtime and a new registry. A rejected
/// declaration fails the load even if the script caught the Lua error with
/// `pcall`. Declarations attempted after this returns are rejected.
pub fn evaluate_definitions(path: &Path, levels: Rc<dyn LevelControl>) -> Result<Definitions, LoadError> {
  let metadata = std::fs::metadata(path).map_err(|source| {
    if source.kind() == std::io::ErrorKind::NotFound {
      LoadError::Missing { path: path.to_path_buf() }
    } else {
      LoadError::Read {
        path: path.to_path_buf(),
        source,
      }
    }
  })?;
  if metadata.is_dir() {
    return Err(LoadError::Read {
      path: path.to_path_buf(),
      source: std::io::Error::other("is a directory"),
    });
  }

  let state = ScriptState::shared();
  let lua = runtime::create_runtime(state.clone(), levels)?;
  runtime::set_definitions_path(&lua, path)?;

  debug!(path = %path.display(), "loading definitions");
  let result = loaders::load_file_with_dir(&lua, path);

  let mut script = state.borrow_mut();
  script.sealed = true;
  if let Some(code) = script.exit_request.take() {
    return Err(LoadError::Exited { code });
  }
  if let Some(err) = script.registration_error.take() {
    return Err(LoadError::Registry(err));
  }
  result?;

  let registry = std::mem::take(&mut script.registry);
  drop(script);

  info!(path = %path.display(), count = registry.len(), "loaded definitions");
  Ok(Definitions {
    path: path.to_path_buf(),
    registry,
    _state: state,
    _lua: lua,
  })
}
