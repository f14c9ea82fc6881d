use std::path::Path;
use std::rc::Rc;

use mlua::prelude::*;

use crate::logging::LevelControl;
use crate::lua::globals;
use crate::lua::state::SharedState;

/// Create a new Lua runtime with the `trestle` and `targets` globals registered.
///
/// Declarations made by scripts running in this runtime land in `state`.
pub fn create_runtime(state: SharedState, levels: Rc<dyn LevelControl>) -> LuaResult<Lua> {
  let lua = Lua::new();
  globals::register_globals(&lua, state, levels)?;
  Ok(lua)
}

/// Point the runtime at the definitions file about to be loaded.
///
/// Sets `trestle.dir` and `trestle.file`, and lets `require` find modules in
/// the `lua/` directory next to the file.
pub fn set_definitions_path(lua: &Lua, path: &Path) -> LuaResult<()> {
  let canonical = dunce::canonicalize(path)
    .map_err(|e| LuaError::external(format!("cannot resolve '{}': {}", path.display(), e)))?;
  let dir = canonical.parent().unwrap_or(Path::new(".")).to_string_lossy().into_owned();

  let trestle: LuaTable = lua.globals().get("trestle")?;
  trestle.set("dir", dir.as_str())?;
  trestle.set("file", canonical.to_string_lossy().into_owned())?;

  let package: LuaTable = lua.globals().get("package")?;
  let package_path: String = package.get("path")?;
  package.set(
    "path",
    format!("{dir}/lua/?.lua;{dir}/lua/?/init.lua;{package_path}"),
  )?;

  Ok(())
}
