//! The `trestle` global table.
//!
//! - `trestle.target{}` - Declare a target (see [`crate::target::lua`])
//! - `trestle.log` - Logging helpers and `set_level`
//! - `trestle.run(cmd)` / `trestle.capture(cmd)` - Run shell commands
//! - `trestle.exit(code?)` - Stop the invocation with an exit code
//! - `trestle.fail(msg)` - Fail the current target
//! - `trestle.include(path)` - Evaluate another definitions file
//! - `trestle.dir` / `trestle.file` - Set once the definitions path is known
//!
//! The `targets` global is registered alongside it.

use std::rc::Rc;

use mlua::prelude::*;
use thiserror::Error;

use super::helpers;
use super::loaders::create_include;
use super::state::SharedState;
use crate::logging::LevelControl;
use crate::target::lua::register_target_api;

/// Raised by `trestle.fail(msg)`.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ScriptFailure(pub String);

/// The message of a `trestle.fail()` call somewhere in `err`, if any.
pub fn failure_message(err: &LuaError) -> Option<&str> {
  match err {
    LuaError::CallbackError { cause, .. } => failure_message(cause),
    LuaError::WithContext { cause, .. } => failure_message(cause),
    LuaError::ExternalError(inner) => inner.downcast_ref::<ScriptFailure>().map(|f| f.0.as_str()),
    _ => None,
  }
}

/// Register the `trestle` and `targets` globals.
pub fn register_globals(lua: &Lua, state: SharedState, levels: Rc<dyn LevelControl>) -> LuaResult<()> {
  let trestle = lua.create_table()?;

  trestle.set("log", helpers::log::create_log_table(lua, levels)?)?;
  helpers::process::register(lua, &trestle)?;
  trestle.set("include", create_include(lua)?)?;

  // The body that called exit() sees the request once its Lua error unwinds
  let weak = Rc::downgrade(&state);
  trestle.set(
    "exit",
    lua.create_function(move |_, code: Option<i32>| {
      let code = code.unwrap_or(0);
      if let Some(state) = weak.upgrade() {
        state.borrow_mut().exit_request = Some(code);
      }
      Err::<(), _>(LuaError::RuntimeError(format!("exit requested with code {code}")))
    })?,
  )?;

  trestle.set(
    "fail",
    lua.create_function(|_, msg: Option<String>| {
      let msg = msg.unwrap_or_else(|| "target failed".to_string());
      Err::<(), _>(LuaError::external(ScriptFailure(msg)))
    })?,
  )?;

  register_target_api(lua, &trestle, state)?;

  lua.globals().set("trestle", trestle)?;
  Ok(())
}
