//! Logging configuration.
//!
//! The engine logs through `tracing`. The binary installs a subscriber with
//! [`init`], which returns a [`LogHandle`] that can change the level while the
//! process runs. The dispatcher and definitions files only see the
//! [`LevelControl`] trait, so embedders (and tests) can pass
//! [`NullLevelControl`] instead.

use std::fmt;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;

use thiserror::Error;
use tracing::debug;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, reload};

#[derive(Debug, Error)]
pub enum LoggingError {
  #[error("unknown log level '{0}' (expected error, warn, notice or debug)")]
  UnknownLevel(String),

  #[error("invalid log directives: {0}")]
  Directives(#[from] tracing_subscriber::filter::ParseError),

  #[error("cannot open log file {}: {source}", path.display())]
  Sink {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to install subscriber: {0}")]
  Install(#[from] tracing_subscriber::util::TryInitError),

  #[error("failed to change log level: {0}")]
  Reload(#[from] reload::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
  Error,
  Warn,
  /// Routine progress messages; maps to `INFO`.
  Notice,
  Debug,
}

impl LogLevel {
  pub fn as_str(self) -> &'static str {
    match self {
      LogLevel::Error => "error",
      LogLevel::Warn => "warn",
      LogLevel::Notice => "notice",
      LogLevel::Debug => "debug",
    }
  }

  /// The `EnvFilter` directive for this level.
  pub fn directive(self) -> &'static str {
    match self {
      LogLevel::Error => "error",
      LogLevel::Warn => "warn",
      LogLevel::Notice => "info",
      LogLevel::Debug => "debug",
    }
  }
}

impl fmt::Display for LogLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for LogLevel {
  type Err = LoggingError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "error" => Ok(LogLevel::Error),
      "warn" | "warning" => Ok(LogLevel::Warn),
      "notice" | "info" => Ok(LogLevel::Notice),
      "debug" => Ok(LogLevel::Debug),
      _ => Err(LoggingError::UnknownLevel(s.to_string())),
    }
  }
}

/// Where log lines are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LogSink {
  #[default]
  Stderr,
  File(PathBuf),
}

/// Changes the active log level.
pub trait LevelControl {
  fn set_level(&self, level: LogLevel) -> Result<(), LoggingError>;
}

/// A [`LevelControl`] that ignores every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLevelControl;

impl LevelControl for NullLevelControl {
  fn set_level(&self, _level: LogLevel) -> Result<(), LoggingError> {
    Ok(())
  }
}

/// Handle to the installed subscriber's filter.
pub struct LogHandle {
  handle: reload::Handle<EnvFilter, Registry>,
  /// Extra directives appended after the base level on every change.
  extra: Option<String>,
}

impl LogHandle {
  fn filter_for(level: LogLevel, extra: Option<&str>) -> Result<EnvFilter, LoggingError> {
    let directives = match extra {
      Some(extra) if !extra.trim().is_empty() => format!("{},{}", level.directive(), extra),
      _ => level.directive().to_string(),
    };
    Ok(EnvFilter::try_new(directives)?)
  }
}

impl LevelControl for LogHandle {
  fn set_level(&self, level: LogLevel) -> Result<(), LoggingError> {
    let filter = Self::filter_for(level, self.extra.as_deref())?;
    self.handle.reload(filter)?;
    debug!(level = %level, "log level changed");
    Ok(())
  }
}

/// Install the global subscriber.
///
/// `extra` holds `EnvFilter` directives (from `TRESTLE_LOG`) that refine the
/// base level, e.g. `trestle_lib::resolve=trace`.
pub fn init(sink: LogSink, level: LogLevel, extra: Option<String>) -> Result<LogHandle, LoggingError> {
  let filter = LogHandle::filter_for(level, extra.as_deref())?;
  let (filter, handle) = reload::Layer::new(filter);

  let writer = match sink {
    LogSink::Stderr => BoxMakeWriter::new(std::io::stderr),
    LogSink::File(path) => {
      let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| LoggingError::Sink { path, source })?;
      BoxMakeWriter::new(Mutex::new(file))
    }
  };

  tracing_subscriber::registry()
    .with(filter)
    .with(
      tracing_subscriber::fmt::layer()
        .without_time()
        .with_target(false)
        .with_writer(writer),
    )
    .try_init()?;

  Ok(LogHandle { handle, extra })
}
