//! Failures and their exit codes.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn unknown_target_fails_without_running_anything() {
  let env = TestEnv::from_fixture("project.lua");

  env
    .trestle_cmd()
    .arg("omega")
    .assert()
    .code(1)
    .stdout("")
    .stderr(predicate::str::contains("unknown target 'omega'"));
}

#[test]
fn cycle_is_reported() {
  let env = TestEnv::from_fixture("cycle.lua");

  env
    .trestle_cmd()
    .arg("A")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("A -> B -> A"));
}

#[test]
fn duplicate_target_fails_to_load() {
  let env = TestEnv::from_fixture("duplicate.lua");

  env
    .trestle_cmd()
    .arg("build")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("duplicate target 'build'"));
}

#[test]
fn no_default_is_a_usage_error() {
  let env = TestEnv::from_fixture("no_default.lua");

  env
    .trestle_cmd()
    .assert()
    .code(2)
    .stderr(predicate::str::contains("no target to run"));
}

#[test]
fn failing_body_stops_the_plan() {
  let env = TestEnv::from_fixture("failing.lua");

  env
    .trestle_cmd()
    .arg("after")
    .assert()
    .code(1)
    .stdout("ran setup\n")
    .stderr(predicate::str::contains("target 'broken' failed: nothing to build"));
}

#[test]
fn verbose_failure_names_the_stage() {
  let env = TestEnv::from_fixture("failing.lua");

  env
    .trestle_cmd()
    .args(["--verbose", "after"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("stage: execute"));
}

#[test]
fn body_exit_code_becomes_process_exit_code() {
  let env = TestEnv::from_fixture("exits.lua");

  env
    .trestle_cmd()
    .arg("stop")
    .assert()
    .code(7)
    .stdout("ran stop\n");
}

#[test]
fn reserved_help_name_is_rejected() {
  let env = TestEnv::empty();
  env.write_file("trestle.lua", r#"trestle.target { name = "help" }"#);

  env
    .trestle_cmd()
    .arg("help")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("reserved"));
}

#[test]
fn failing_shell_command_fails_the_target() {
  if cfg!(windows) {
    return;
  }

  let env = TestEnv::empty();
  env.write_file("trestle.lua", r#"targets.sh = function() trestle.run("exit 4") end"#);

  env
    .trestle_cmd()
    .arg("sh")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("exit code 4"));
}
