//! Definitions file loading with per-file `__dir` and `__file` injection.
//!
//! Every file is evaluated in its own environment table that inherits from
//! `_G` and carries `__dir` (the directory of the file) and `__file` (its
//! canonical path). The file currently being evaluated is also tracked in the
//! Lua registry so that `trestle.target{}` can record where a target was
//! declared and `trestle.include()` can resolve relative paths.

use std::fs;
use std::path::{Path, PathBuf};

use mlua::prelude::*;
use tracing::debug;

/// Registry key holding the directory of the file being evaluated.
const CURRENT_DIR_KEY: &str = "__trestle_current_dir";

/// Registry key holding the path of the file being evaluated.
const CURRENT_FILE_KEY: &str = "__trestle_current_file";

/// Load and evaluate a Lua file with `__dir` and `__file` set.
///
/// The previous current file is restored afterwards, so nested loads through
/// `trestle.include()` attribute targets to the right file.
pub fn load_file_with_dir(lua: &Lua, path: &Path) -> LuaResult<LuaValue> {
  let canonical_path = dunce::canonicalize(path)
    .map_err(|e| LuaError::external(format!("cannot resolve '{}': {}", path.display(), e)))?;

  let content = fs::read_to_string(&canonical_path)
    .map_err(|e| LuaError::external(format!("cannot read '{}': {}", canonical_path.display(), e)))?;

  let dir = canonical_path
    .parent()
    .unwrap_or(Path::new("."))
    .to_string_lossy()
    .into_owned();
  let file = canonical_path.to_string_lossy().into_owned();

  let prev_dir: Option<String> = lua.named_registry_value(CURRENT_DIR_KEY)?;
  let prev_file: Option<String> = lua.named_registry_value(CURRENT_FILE_KEY)?;
  lua.set_named_registry_value(CURRENT_DIR_KEY, dir.as_str())?;
  lua.set_named_registry_value(CURRENT_FILE_KEY, file.as_str())?;

  let env = lua.create_table()?;
  env.set("__dir", dir)?;
  env.set("__file", file)?;

  let mt = lua.create_table()?;
  mt.set("__index", lua.globals())?;
  mt.set("__newindex", lua.globals())?;
  env.set_metatable(Some(mt))?;

  debug!(path = %canonical_path.display(), "evaluating definitions file");
  let result = lua
    .load(&content)
    .set_name(format!("@{}", canonical_path.display()))
    .set_environment(env)
    .eval::<LuaValue>();

  // Ignore cleanup errors so the original error is not masked
  let _ = lua.set_named_registry_value(CURRENT_DIR_KEY, prev_dir);
  let _ = lua.set_named_registry_value(CURRENT_FILE_KEY, prev_file);

  result
}

/// The file currently being evaluated, if any.
pub fn current_file(lua: &Lua) -> LuaResult<Option<String>> {
  lua.named_registry_value(CURRENT_FILE_KEY)
}

/// The directory of the file currently being evaluated, if any.
pub fn current_dir(lua: &Lua) -> LuaResult<Option<String>> {
  lua.named_registry_value(CURRENT_DIR_KEY)
}

/// Resolve `path_str` against the directory of the file being evaluated.
///
/// Absolute paths are returned unchanged; with no file being evaluated the
/// path is left relative to the working directory.
pub fn resolve_path(lua: &Lua, path_str: &str) -> LuaResult<PathBuf> {
  let path = Path::new(path_str);
  if path.is_absolute() {
    return Ok(path.to_path_buf());
  }

  match current_dir(lua)? {
    Some(dir) => Ok(Path::new(&dir).join(path)),
    None => Ok(path.to_path_buf()),
  }
}

/// Create the `trestle.include(path)` function.
///
/// Evaluates another definitions file, resolving relative paths against the
/// including file, and returns whatever that file returns.
pub fn create_include(lua: &Lua) -> LuaResult<LuaFunction> {
  lua.create_function(|lua, path: String| {
    let resolved = resolve_path(lua, &path)?;
    load_file_with_dir(lua, &resolved)
  })
}
