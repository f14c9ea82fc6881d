//! `trestle.run` and `trestle.capture`.
//!
//! Commands run synchronously through the platform shell (`/bin/sh -c` or
//! `cmd.exe /C`). The child inherits the environment, extended with `env`.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use mlua::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ProcessError {
  #[error("failed to spawn '{cmd}': {source}")]
  Spawn {
    cmd: String,
    #[source]
    source: std::io::Error,
  },

  #[error("command '{cmd}' failed with {}", describe_code(*code))]
  Failed { cmd: String, code: Option<i32> },
}

fn describe_code(code: Option<i32>) -> String {
  match code {
    Some(code) => format!("exit code {code}"),
    None => "no exit code (terminated by signal)".to_string(),
  }
}

/// A shell command and how to run it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CmdOptions {
  pub cmd: String,
  pub cwd: Option<PathBuf>,
  pub env: BTreeMap<String, String>,
}

impl CmdOptions {
  pub fn new(cmd: impl Into<String>) -> Self {
    Self {
      cmd: cmd.into(),
      ..Default::default()
    }
  }

  pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
    self.cwd = Some(cwd.into());
    self
  }

  pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.env.insert(key.into(), value.into());
    self
  }

  fn command(&self) -> Command {
    let (shell, args) = get_shell();
    let mut command = Command::new(shell);
    command.args(args).arg(&self.cmd).envs(&self.env);
    if let Some(cwd) = &self.cwd {
      command.current_dir(cwd);
    }
    command
  }
}

/// Parse `trestle.run` arguments: a command string or `{ cmd, cwd?, env? }`.
pub fn parse_cmd_opts(opts: LuaValue) -> LuaResult<CmdOptions> {
  match opts {
    LuaValue::String(s) => Ok(CmdOptions::new(s.to_str()?.to_string())),
    LuaValue::Table(table) => {
      let cmd: String = table
        .get("cmd")
        .map_err(|_| LuaError::external("command table requires a 'cmd' string"))?;
      let cwd: Option<String> = table.get("cwd")?;
      let env: Option<LuaTable> = table.get("env")?;

      let mut opts = CmdOptions::new(cmd);
      if let Some(cwd) = cwd {
        opts = opts.with_cwd(cwd);
      }
      if let Some(env) = env {
        for pair in env.pairs::<String, String>() {
          let (key, value) = pair?;
          opts = opts.with_env(key, value);
        }
      }
      Ok(opts)
    }
    _ => Err(LuaError::external("expected a command string or a table with a 'cmd' field")),
  }
}

/// Run a command with inherited stdio, failing on a nonzero exit.
pub fn run(opts: &CmdOptions) -> Result<(), ProcessError> {
  info!(cmd = %opts.cmd, "running command");
  let status = opts
    .command()
    .stdin(Stdio::inherit())
    .stdout(Stdio::inherit())
    .stderr(Stdio::inherit())
    .status()
    .map_err(|source| ProcessError::Spawn {
      cmd: opts.cmd.clone(),
      source,
    })?;

  if !status.success() {
    return Err(ProcessError::Failed {
      cmd: opts.cmd.clone(),
      code: status.code(),
    });
  }
  Ok(())
}

/// Run a command and return its trimmed stdout. Stderr is inherited.
pub fn capture(opts: &CmdOptions) -> Result<String, ProcessError> {
  info!(cmd = %opts.cmd, "capturing command output");
  let output = opts
    .command()
    .stdin(Stdio::null())
    .stderr(Stdio::inherit())
    .output()
    .map_err(|source| ProcessError::Spawn {
      cmd: opts.cmd.clone(),
      source,
    })?;

  if !output.status.success() {
    return Err(ProcessError::Failed {
      cmd: opts.cmd.clone(),
      code: output.status.code(),
    });
  }

  let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
  if !stdout.is_empty() {
    debug!(stdout = %stdout, "command output");
  }
  Ok(stdout)
}

/// The shell used to interpret command strings.
fn get_shell() -> (&'static str, &'static [&'static str]) {
  #[cfg(unix)]
  {
    ("/bin/sh", &["-c"][..])
  }

  #[cfg(windows)]
  {
    ("cmd.exe", &["/C"][..])
  }
}

/// Register `run` and `capture` on the `trestle` table.
pub fn register(lua: &Lua, trestle: &LuaTable) -> LuaResult<()> {
  trestle.set(
    "run",
    lua.create_function(|_, opts: LuaValue| {
      let opts = parse_cmd_opts(opts)?;
      run(&opts).map_err(LuaError::external)
    })?,
  )?;

  trestle.set(
    "capture",
    lua.create_function(|_, opts: LuaValue| {
      let opts = parse_cmd_opts(opts)?;
      capture(&opts).map_err(LuaError::external)
    })?,
  )?;

  Ok(())
}
