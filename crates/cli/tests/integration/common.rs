//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Read fixture content.
pub fn fixture_content(name: &str) -> String {
  std::fs::read_to_string(fixture_path(name)).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e))
}

/// Isolated test environment.
///
/// Each test gets its own temporary project directory.
pub struct TestEnv {
  pub temp: TempDir,
  pub definitions: PathBuf,
}

impl TestEnv {
  /// Create from a fixture file.
  ///
  /// Copies the fixture content to a temporary `trestle.lua` file.
  pub fn from_fixture(name: &str) -> Self {
    let env = Self::empty();
    std::fs::write(&env.definitions, fixture_content(name)).unwrap();
    env
  }

  /// Create an empty project directory.
  pub fn empty() -> Self {
    let temp = TempDir::new().unwrap();
    let definitions = temp.path().join("trestle.lua");
    Self { temp, definitions }
  }

  /// Write a file relative to the project directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// Get a Command for the trestle binary, run from the project directory.
  ///
  /// Clears the environment variables that would otherwise redirect the
  /// definitions file or the logs.
  pub fn trestle_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("trestle");
    cmd.current_dir(self.temp.path());
    cmd.env_remove("TRESTLE_FILE");
    cmd.env_remove("TRESTLE_LOG");
    cmd.env_remove("TRESTLE_LOG_FILE");
    cmd
  }
}
