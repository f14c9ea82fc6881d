//! `--format json` output.

use serde_json::Value;

use super::common::TestEnv;

fn json_stdout(output: &std::process::Output) -> Value {
  serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
    panic!(
      "stdout is not JSON ({}): {}",
      e,
      String::from_utf8_lossy(&output.stdout)
    )
  })
}

#[test]
fn help_as_json() {
  let env = TestEnv::from_fixture("project.lua");

  let output = env
    .trestle_cmd()
    .args(["--format", "json", "help"])
    .assert()
    .success()
    .get_output()
    .clone();
  let json = json_stdout(&output);

  assert_eq!(json["outcome"], "help");
  assert_eq!(json["targets"][2]["name"], "gamma");
  assert_eq!(json["targets"][2]["default"], true);
  assert_eq!(json["targets"][3]["requires"][0], "beta");
}

#[test]
fn init_only_as_json() {
  let env = TestEnv::from_fixture("project.lua");

  let output = env
    .trestle_cmd()
    .args(["--format", "json", "--init-only", "beta"])
    .assert()
    .success()
    .get_output()
    .clone();
  let json = json_stdout(&output);

  assert_eq!(json["outcome"], "init-only");
  assert_eq!(json["target"], "beta");
  assert_eq!(json["plan"], serde_json::json!(["alpha", "beta"]));
}

#[test]
fn error_as_json() {
  let env = TestEnv::from_fixture("cycle.lua");

  let output = env
    .trestle_cmd()
    .args(["--format", "json", "A"])
    .assert()
    .code(1)
    .get_output()
    .clone();
  let json = json_stdout(&output);

  assert_eq!(json["kind"], "cyclic-dependency");
  assert_eq!(json["stage"], "resolve");
  assert_eq!(json["exit_code"], 1);
}
