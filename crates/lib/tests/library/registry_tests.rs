//! Targets registered from Rust, resolved and executed without a definitions file.

use std::cell::RefCell;
use std::rc::Rc;

use trestle_lib::{
  BodyError, ExecuteError, ResolveError, Session, TargetBody, TargetDef, TargetRegistry, execute, resolve,
};

fn recording(log: &Rc<RefCell<Vec<String>>>, name: &str) -> TargetBody {
  let log = Rc::clone(log);
  let name = name.to_string();
  TargetBody::new(move |_| {
    log.borrow_mut().push(name.clone());
    Ok(())
  })
}

#[test]
fn diamond_runs_each_target_once() {
  let log = Rc::new(RefCell::new(Vec::new()));
  let mut registry = TargetRegistry::new();
  registry.register("root", recording(&log, "root"), Vec::<String>::new(), false).unwrap();
  registry.register("left", recording(&log, "left"), ["root"], false).unwrap();
  registry.register("right", recording(&log, "right"), ["root"], false).unwrap();
  let top = registry.register("top", recording(&log, "top"), ["left", "right"], true).unwrap();

  let plan = resolve(&top, &registry).unwrap();
  let summary = execute(&plan, &Session::default()).unwrap();

  assert_eq!(*log.borrow(), vec!["root", "left", "right", "top"]);
  assert_eq!(summary.names(), vec!["root", "left", "right", "top"]);
  assert!(summary.halted_by.is_none());
}

#[test]
fn unresolved_names_are_allowed_until_resolution() {
  let mut registry = TargetRegistry::new();
  let late = registry.register("late", TargetBody::noop(), ["later"], false).unwrap();

  let err = resolve(&late, &registry).unwrap_err();
  assert!(matches!(err, ResolveError::UnknownTarget { ref name, .. } if name == "later"));

  registry.register("later", TargetBody::noop(), Vec::<String>::new(), false).unwrap();
  assert_eq!(resolve(&late, &registry).unwrap().names(), vec!["later", "late"]);
}

#[test]
fn self_dependency_is_a_cycle() {
  let mut registry = TargetRegistry::new();
  let me = registry.register("me", TargetBody::noop(), ["me"], false).unwrap();

  let err = resolve(&me, &registry).unwrap_err();
  assert_eq!(
    err,
    ResolveError::CyclicDependency {
      cycle: vec!["me".to_string(), "me".to_string()]
    }
  );
}

#[test]
fn failure_reports_the_failing_target() {
  let log = Rc::new(RefCell::new(Vec::new()));
  let mut registry = TargetRegistry::new();
  registry.register("fine", recording(&log, "fine"), Vec::<String>::new(), false).unwrap();
  registry
    .register("broken", TargetBody::new(|_| Err(BodyError::failed("disk full"))), ["fine"], false)
    .unwrap();
  let last = registry.register("last", recording(&log, "last"), ["broken"], false).unwrap();

  let plan = resolve(&last, &registry).unwrap();
  let err = execute(&plan, &Session::default()).unwrap_err();

  assert_eq!(err.target(), "broken");
  assert!(matches!(err, ExecuteError::TargetFailed { .. }));
  assert_eq!(err.to_string(), "target 'broken' failed: disk full");
  assert_eq!(*log.borrow(), vec!["fine"]);
}

#[test]
fn help_text_and_location_survive_registration() {
  let mut registry = TargetRegistry::new();
  registry
    .insert(
      TargetDef::new("docs", TargetBody::noop())
        .with_help("Build the docs")
        .declared_at("build.rs"),
    )
    .unwrap();

  let summary = registry.lookup("docs").unwrap().summary();
  assert_eq!(summary.help.as_deref(), Some("Build the docs"));
  assert!(!summary.default);
  assert_eq!(registry.lookup("docs").unwrap().declared_at, "build.rs");
}
