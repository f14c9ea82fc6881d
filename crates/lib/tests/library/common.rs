//! Shared helpers for library integration tests.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use trestle_lib::{DispatchError, Dispatcher, Outcome};

/// A throwaway project directory holding a definitions file.
pub struct Project {
  pub temp: TempDir,
  pub definitions: PathBuf,
}

impl Project {
  /// Write `content` as `trestle.lua`.
  pub fn new(content: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let definitions = temp.path().join("trestle.lua");
    let project = Self { temp, definitions };
    project.write("trestle.lua", content);
    project
  }

  /// Write a Lua file in the project. Every file can use `mark(name)`.
  pub fn write(&self, relative: &str, content: &str) {
    let path = self.temp.path().join(relative);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    let prelude = format!("local MARKS = {}\n{}", lua_string(&self.marks_path()), MARK_PRELUDE);
    std::fs::write(path, format!("{}\n{}", prelude, content)).unwrap();
  }

  pub fn marks_path(&self) -> PathBuf {
    self.temp.path().join("marks.txt")
  }

  /// Names passed to `mark()`, in call order.
  pub fn marks(&self) -> Vec<String> {
    std::fs::read_to_string(self.marks_path())
      .unwrap_or_default()
      .lines()
      .map(String::from)
      .collect()
  }

  /// Run one invocation against this project's definitions.
  pub fn invoke(&self, args: &[&str]) -> Result<Outcome, DispatchError> {
    self.invoke_with(&mut Dispatcher::new(), args)
  }

  pub fn invoke_with(&self, dispatcher: &mut Dispatcher, args: &[&str]) -> Result<Outcome, DispatchError> {
    let mut argv = vec!["-f".to_string(), self.definitions.to_string_lossy().into_owned()];
    argv.extend(args.iter().map(|a| a.to_string()));
    dispatcher.invoke(argv)
  }
}

/// Defines `mark(name)`, returning a body that appends `name` to the marks file.
const MARK_PRELUDE: &str = r#"
local function mark(name)
  return function()
    local f = assert(io.open(MARKS, "a"))
    f:write(name, "\n")
    f:close()
  end
end
"#;

/// A Lua string literal for `path`.
pub fn lua_string(path: &Path) -> String {
  format!("{:?}", path.to_string_lossy().replace('\\', "/"))
}
