//! Definitions files loaded through `eval::evaluate_definitions`.

use std::rc::Rc;

use trestle_lib::eval::{LoadError, evaluate_definitions};
use trestle_lib::logging::NullLevelControl;
use trestle_lib::{RegistryError, Session, resolve};

use super::common::Project;

fn load(project: &Project) -> Result<trestle_lib::eval::Definitions, LoadError> {
  evaluate_definitions(&project.definitions, Rc::new(NullLevelControl))
}

#[test]
fn registration_order_is_preserved() {
  let project = Project::new(
    r#"
      targets.zeta = mark("z")
      trestle.target { name = "alpha" }
      targets.mu = trestle.target { help = "middle" }
    "#,
  );
  let defs = load(&project).unwrap();
  assert_eq!(defs.registry().names(), vec!["zeta", "alpha", "mu"]);
  assert_eq!(defs.registry().lookup("mu").unwrap().help.as_deref(), Some("middle"));
}

#[test]
fn modules_next_to_the_definitions_can_be_required() {
  let project = Project::new(
    r#"
      local shared = require("shared")
      shared.declare("from-module")
    "#,
  );
  project.write(
    "lua/shared.lua",
    r#"
      return {
        declare = function(name) targets[name] = mark(name) end,
      }
    "#,
  );

  let defs = load(&project).unwrap();
  assert_eq!(defs.registry().names(), vec!["from-module"]);
}

#[test]
fn dir_and_file_point_at_the_definitions() {
  let project = Project::new(
    r#"
      assert(trestle.file:sub(-#"trestle.lua") == "trestle.lua", trestle.file)
      assert(__dir == trestle.dir, "__dir should match trestle.dir")
      targets.ok = mark("ok")
    "#,
  );
  assert!(load(&project).is_ok());
}

#[test]
fn loading_does_not_run_bodies() {
  let project = Project::new(
    r#"
      targets.a = mark("a")
      targets.b = trestle.target { requires = "a", run = mark("b") }
    "#,
  );
  let defs = load(&project).unwrap();
  let plan = resolve(&defs.registry().lookup("b").unwrap(), defs.registry()).unwrap();

  assert_eq!(plan.names(), vec!["a", "b"]);
  assert!(project.marks().is_empty());

  for def in &plan {
    def.body.call(&Session::default()).unwrap();
  }
  assert_eq!(project.marks(), vec!["a", "b"]);
}

#[test]
fn duplicate_across_included_files_names_both_locations() {
  let project = Project::new(
    r#"
      targets.shared = mark("main")
      trestle.include("extra.lua")
    "#,
  );
  project.write("extra.lua", r#"targets.shared = mark("extra")"#);

  let err = load(&project).unwrap_err();
  let LoadError::Registry(RegistryError::DuplicateTarget { name, first, second }) = err else {
    panic!("expected duplicate target error, got {:?}", err);
  };
  assert_eq!(name, "shared");
  assert!(first.ends_with("trestle.lua"), "{}", first);
  assert!(second.ends_with("extra.lua"), "{}", second);
}

#[test]
fn help_is_a_reserved_name() {
  let project = Project::new(r#"trestle.target { name = "help" }"#);
  let err = load(&project).unwrap_err();
  assert!(matches!(err, LoadError::Registry(RegistryError::ReservedName { .. })));
}

#[test]
fn lua_errors_are_load_errors() {
  let project = Project::new(r#"error("broken definitions")"#);
  let err = load(&project).unwrap_err();

  assert!(matches!(err, LoadError::Lua(_)));
  assert!(err.to_string().contains("broken definitions"), "{}", err);
}
