//! `trestle.log`: logging from definitions files.

use std::rc::Rc;

use mlua::prelude::*;
use tracing::{debug, error, info, warn};

use crate::logging::{LevelControl, LogLevel};

/// Create the `trestle.log` table.
///
/// `set_level` goes through `levels`, so it changes the level of the
/// subscriber the host installed rather than a Lua-side flag.
pub fn create_log_table(lua: &Lua, levels: Rc<dyn LevelControl>) -> LuaResult<LuaTable> {
  let log = lua.create_table()?;

  log.set(
    "error",
    lua.create_function(|_, msg: String| {
      error!(source = "lua", "{}", msg);
      Ok(())
    })?,
  )?;
  log.set(
    "warn",
    lua.create_function(|_, msg: String| {
      warn!(source = "lua", "{}", msg);
      Ok(())
    })?,
  )?;
  log.set(
    "notice",
    lua.create_function(|_, msg: String| {
      info!(source = "lua", "{}", msg);
      Ok(())
    })?,
  )?;
  log.set(
    "debug",
    lua.create_function(|_, msg: String| {
      debug!(source = "lua", "{}", msg);
      Ok(())
    })?,
  )?;

  log.set(
    "set_level",
    lua.create_function(move |_, level: String| {
      let level: LogLevel = level.parse().map_err(LuaError::external)?;
      levels.set_level(level).map_err(LuaError::external)
    })?,
  )?;

  Ok(log)
}
