//! Running targets through the binary.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn named_target_runs_with_prerequisites_in_order() {
  let env = TestEnv::from_fixture("project.lua");

  env
    .trestle_cmd()
    .arg("delta")
    .assert()
    .success()
    .stdout("ran alpha\nran beta\nran gamma\nran delta\n");
}

#[test]
fn default_target_runs_without_arguments() {
  let env = TestEnv::from_fixture("project.lua");

  env.trestle_cmd().assert().success().stdout("ran gamma\n");
}

#[test]
fn success_is_reported_on_stderr() {
  let env = TestEnv::from_fixture("project.lua");

  env
    .trestle_cmd()
    .arg("beta")
    .assert()
    .success()
    .stderr(predicate::str::contains("beta (2 target(s)"));
}

#[test]
fn quiet_suppresses_status_lines() {
  let env = TestEnv::from_fixture("project.lua");

  env
    .trestle_cmd()
    .args(["--quiet", "beta"])
    .assert()
    .success()
    .stdout("ran alpha\nran beta\n")
    .stderr("");
}

#[test]
fn verbose_lists_each_target() {
  let env = TestEnv::from_fixture("project.lua");

  env
    .trestle_cmd()
    .args(["--verbose", "beta"])
    .assert()
    .success()
    .stderr(predicate::str::contains("alpha:").and(predicate::str::contains("beta:")));
}

#[test]
fn init_only_runs_no_body() {
  let env = TestEnv::from_fixture("project.lua");

  env
    .trestle_cmd()
    .args(["--init-only", "delta"])
    .assert()
    .success()
    .stdout("")
    .stderr(predicate::str::contains("alpha → beta → gamma → delta"));
}

#[test]
fn help_lists_targets_in_registration_order() {
  let env = TestEnv::from_fixture("project.lua");

  let output = env.trestle_cmd().arg("help").assert().success().get_output().stdout.clone();
  let listing = String::from_utf8(output).unwrap();
  let names: Vec<&str> = listing
    .lines()
    .filter_map(|line| line.trim_start_matches('*').split_whitespace().next())
    .collect();

  assert_eq!(names, vec!["alpha", "beta", "gamma", "delta"]);
  assert!(listing.contains("The default"));
  assert!(!listing.contains("ran "));
}

#[test]
fn help_marks_the_default() {
  let env = TestEnv::from_fixture("project.lua");

  env
    .trestle_cmd()
    .arg("help")
    .assert()
    .success()
    .stdout(predicate::str::is_match(r"(?m)^\* gamma").unwrap());
}

#[test]
fn explicit_file_flag() {
  let env = TestEnv::empty();
  env.write_file("build/defs.lua", &super::common::fixture_content("project.lua"));
  let elsewhere = tempfile::TempDir::new().unwrap();

  env
    .trestle_cmd()
    .current_dir(elsewhere.path())
    .args(["-f"])
    .arg(env.temp.path().join("build/defs.lua"))
    .arg("alpha")
    .assert()
    .success()
    .stdout("ran alpha\n");
}

#[test]
fn included_files_register_targets() {
  let env = TestEnv::empty();
  env.write_file("trestle.lua", r#"trestle.include("more/extra.lua")"#);
  env.write_file(
    "more/extra.lua",
    r#"targets.extra = function() print("ran extra from " .. __dir:match("[^/\\]+$")) end"#,
  );

  env
    .trestle_cmd()
    .arg("extra")
    .assert()
    .success()
    .stdout("ran extra from more\n");
}

#[test]
fn exit_zero_stops_successfully() {
  let env = TestEnv::from_fixture("exits.lua");

  env
    .trestle_cmd()
    .arg("after_done")
    .assert()
    .success()
    .stdout("")
    .stderr(predicate::str::contains("'done' stopped the run early"));
}

#[test]
fn exit_zero_while_loading_is_success() {
  let env = TestEnv::empty();
  env.write_file("trestle.lua", "trestle.exit(0)\ntargets.never = function() end");

  env.trestle_cmd().arg("never").assert().success();
}
