//! Environment-driven configuration.
//!
//! - `TRESTLE_FILE` - definitions path used when `--file` is absent
//! - `TRESTLE_LOG` - extra `tracing` filter directives
//! - `TRESTLE_LOG_FILE` - write logs to this file instead of stderr

use std::env;
use std::path::{Path, PathBuf};

use crate::consts::{DEFAULT_FILE_NAMES, FILE_ENV, LOG_ENV, LOG_FILE_ENV};
use crate::eval::LoadError;
use crate::logging::LogSink;

/// Read a non-empty environment variable.
fn non_empty_var(name: &str) -> Option<String> {
  env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// The definitions file for this invocation.
///
/// Precedence: `explicit` (from `--file`), then `TRESTLE_FILE`, then the first
/// default file name present in the working directory.
pub fn definitions_path(explicit: Option<&Path>) -> Result<PathBuf, LoadError> {
  if let Some(path) = explicit {
    return Ok(path.to_path_buf());
  }
  if let Some(path) = non_empty_var(FILE_ENV) {
    return Ok(PathBuf::from(path));
  }

  let cwd = env::current_dir().map_err(|source| LoadError::Read {
    path: PathBuf::from("."),
    source,
  })?;
  find_default_file(&cwd)
}

/// The first of [`DEFAULT_FILE_NAMES`] that exists in `dir`.
pub fn find_default_file(dir: &Path) -> Result<PathBuf, LoadError> {
  DEFAULT_FILE_NAMES
    .iter()
    .map(|name| dir.join(name))
    .find(|path| path.is_file())
    .ok_or_else(|| LoadError::NotFound {
      dir: dir.to_path_buf(),
      candidates: DEFAULT_FILE_NAMES.iter().map(|s| s.to_string()).collect(),
    })
}

/// Extra filter directives from `TRESTLE_LOG`.
pub fn log_directives() -> Option<String> {
  non_empty_var(LOG_ENV)
}

/// Log destination from `TRESTLE_LOG_FILE`, defaulting to stderr.
pub fn log_sink() -> LogSink {
  match non_empty_var(LOG_FILE_ENV) {
    Some(path) => LogSink::File(PathBuf::from(path)),
    None => LogSink::Stderr,
  }
}
