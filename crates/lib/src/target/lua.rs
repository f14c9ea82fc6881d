//! Target declaration from Lua.
//!
//! Two forms are supported:
//!
//! ```lua
//! -- explicit name; returns a handle usable in `requires`
//! local build = trestle.target {
//!   name = "build",
//!   requires = { "clean" },
//!   default = true,
//!   help = "Compile everything",
//!   run = function(session) trestle.run("make") end,
//! }
//!
//! -- the key becomes the name
//! targets.clean = function(session) trestle.run("rm -rf out") end
//! targets.install = trestle.target { requires = build, run = function() ... end }
//! ```
//!
//! Bodies are stored, never called, until the plan runs.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use mlua::prelude::*;
use tracing::debug;

use super::{BodyError, TARGET_REF_TYPE, TARGET_SPEC_TYPE, TargetBody, TargetDef};
use crate::lua::globals::failure_message;
use crate::lua::loaders::current_file;
use crate::lua::state::{ScriptState, SharedState};

/// Registry key of the table mapping target names to their handles.
const HANDLES_KEY: &str = "__trestle_target_handles";

/// Register `trestle.target` and the `targets` global.
pub fn register_target_api(lua: &Lua, trestle: &LuaTable, state: SharedState) -> LuaResult<()> {
  lua.set_named_registry_value(HANDLES_KEY, lua.create_table()?)?;

  let weak = Rc::downgrade(&state);
  let target_fn = lua.create_function(move |lua, spec: LuaTable| {
    let name: Option<String> = spec.get("name")?;
    match name {
      Some(name) => Ok(LuaValue::Table(register_spec(lua, &weak, name, &spec)?)),
      None => {
        // Registered once it is assigned into `targets`
        let mt = lua.create_table()?;
        mt.set("__type", TARGET_SPEC_TYPE)?;
        spec.set_metatable(Some(mt))?;
        Ok(LuaValue::Table(spec))
      }
    }
  })?;
  trestle.set("target", target_fn)?;

  let targets = lua.create_table()?;
  let mt = lua.create_table()?;

  let weak = Rc::downgrade(&state);
  mt.set(
    "__newindex",
    lua.create_function(move |lua, (_, key, value): (LuaTable, String, LuaValue)| {
      match value {
        LuaValue::Function(run) => {
          let spec = lua.create_table()?;
          spec.set("run", run)?;
          register_spec(lua, &weak, key, &spec)?;
          Ok(())
        }
        LuaValue::Table(spec) => match ref_type(&spec).as_deref() {
          Some(TARGET_SPEC_TYPE) => {
            register_spec(lua, &weak, key, &spec)?;
            Ok(())
          }
          Some(TARGET_REF_TYPE) => {
            let name: String = spec.get("name")?;
            if name == key {
              Ok(())
            } else {
              Err(LuaError::external(format!(
                "cannot assign target '{name}' to targets.{key}; targets cannot be renamed"
              )))
            }
          }
          _ => Err(LuaError::external(format!(
            "targets.{key} must be a function or a trestle.target{{}} spec"
          ))),
        },
        other => Err(LuaError::external(format!(
          "targets.{key} must be a function or a trestle.target{{}} spec, got {}",
          other.type_name()
        ))),
      }
    })?,
  )?;

  mt.set(
    "__index",
    lua.create_function(|lua, (_, key): (LuaTable, String)| {
      let handles: LuaTable = lua.named_registry_value(HANDLES_KEY)?;
      match handles.get::<Option<LuaTable>>(key.as_str())? {
        Some(handle) => Ok(handle),
        None => Err(LuaError::external(format!("unknown target '{key}'"))),
      }
    })?,
  )?;

  targets.set_metatable(Some(mt))?;
  lua.globals().set("targets", targets)?;

  Ok(())
}

/// Turn a spec table into a registered [`TargetDef`] and return its handle.
fn register_spec(lua: &Lua, state: &Weak<RefCell<ScriptState>>, name: String, spec: &LuaTable) -> LuaResult<LuaTable> {
  let state = state
    .upgrade()
    .ok_or_else(|| LuaError::external("definitions are no longer being loaded"))?;

  if state.borrow().sealed {
    return Err(LuaError::external(format!(
      "cannot declare target '{name}' after definitions have been loaded"
    )));
  }

  let requires = parse_requires(spec.get("requires")?)?;
  let is_default: Option<bool> = spec.get("default")?;
  let help: Option<String> = spec.get("help")?;

  let run = match spec.get::<LuaValue>("run")? {
    LuaValue::Nil => spec.get::<LuaValue>(1)?,
    run => run,
  };
  let body = match run {
    LuaValue::Function(func) => lua_body(func, Rc::downgrade(&state)),
    LuaValue::Nil => TargetBody::noop(),
    other => {
      return Err(LuaError::external(format!(
        "target '{name}': run must be a function, got {}",
        other.type_name()
      )));
    }
  };

  let declared_at = current_file(lua)?.unwrap_or_else(|| "<lua>".to_string());
  let mut def = TargetDef::new(name.clone(), body)
    .with_requires(requires)
    .with_default(is_default.unwrap_or(false))
    .declared_at(declared_at);
  if let Some(help) = help {
    def = def.with_help(help);
  }

  let inserted = state.borrow_mut().registry.insert(def);
  if let Err(err) = inserted {
    state.borrow_mut().record_error(&err);
    return Err(LuaError::external(err));
  }

  debug!(name = %name, "declared target");
  let handle = create_handle(lua, &name)?;
  let handles: LuaTable = lua.named_registry_value(HANDLES_KEY)?;
  handles.set(name.as_str(), handle.clone())?;
  Ok(handle)
}

/// Wrap a Lua function as a target body.
///
/// The function receives the session userdata. A `trestle.exit()` during the
/// call wins over whatever error unwound the function.
fn lua_body(func: LuaFunction, state: Weak<RefCell<ScriptState>>) -> TargetBody {
  TargetBody::new(move |session| {
    let result = func.call::<()>(session.clone());

    let exit = state.upgrade().and_then(|state| state.borrow_mut().exit_request.take());
    if let Some(code) = exit {
      return Err(BodyError::Exit(code));
    }

    result.map_err(|err| match failure_message(&err) {
      Some(msg) => BodyError::Failed(msg.to_string()),
      None => BodyError::Lua(err),
    })
  })
}

fn create_handle(lua: &Lua, name: &str) -> LuaResult<LuaTable> {
  let handle = lua.create_table()?;
  handle.set("name", name)?;

  let mt = lua.create_table()?;
  mt.set("__type", TARGET_REF_TYPE)?;
  let display = format!("target({name})");
  mt.set("__tostring", lua.create_function(move |_, _: LuaValue| Ok(display.clone()))?)?;
  handle.set_metatable(Some(mt))?;

  Ok(handle)
}

/// The `__type` marker of a table, if it has one.
fn ref_type(table: &LuaTable) -> Option<String> {
  table.metatable().and_then(|mt| mt.get::<String>("__type").ok())
}

/// Normalize `requires` to a list of names.
///
/// Accepts nil, a single reference, or a sequence of references. A reference
/// is a target name or a handle returned by `trestle.target{}`.
fn parse_requires(value: LuaValue) -> LuaResult<Vec<String>> {
  match value {
    LuaValue::Nil => Ok(Vec::new()),
    LuaValue::Table(ref table) if ref_type(table).is_none() => table
      .clone()
      .sequence_values::<LuaValue>()
      .map(|item| parse_reference(item?))
      .collect(),
    other => Ok(vec![parse_reference(other)?]),
  }
}

fn parse_reference(value: LuaValue) -> LuaResult<String> {
  match value {
    LuaValue::String(s) => Ok(s.to_str()?.to_string()),
    LuaValue::Table(table) => match ref_type(&table).as_deref() {
      Some(TARGET_REF_TYPE) => table.get("name"),
      Some(TARGET_SPEC_TYPE) => Err(LuaError::external(
        "requires refers to a target that has not been named; assign it into `targets` first",
      )),
      _ => Err(LuaError::external("requires entries must be target names or target handles")),
    },
    other => Err(LuaError::external(format!(
      "requires entries must be target names or target handles, got {}",
      other.type_name()
    ))),
  }
}
