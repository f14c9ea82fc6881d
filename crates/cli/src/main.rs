mod cmd;
mod output;

use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use trestle_lib::logging::{self, LevelControl, NullLevelControl};
use trestle_lib::{Args, Verbosity, config};

use crate::cmd::cmd_run;
use crate::output::print_warning;

fn main() -> ExitCode {
  // Usage errors, --help and --version exit here with clap's own codes
  let args = Args::parse();

  let levels = init_logging(&args);
  cmd_run(&args, levels)
}

/// Install the tracing subscriber at the level the verbosity flags ask for.
///
/// Falls back to a level control that ignores changes if the subscriber
/// cannot be installed, e.g. when the log file cannot be opened.
fn init_logging(args: &Args) -> Rc<dyn LevelControl> {
  let level = Verbosity::from_flags(args.quiet, args.verbose)
    .unwrap_or_default()
    .log_level();

  match logging::init(config::log_sink(), level, config::log_directives()) {
    Ok(handle) => Rc::new(handle),
    Err(err) => {
      print_warning(&format!("logging disabled: {}", err));
      Rc::new(NullLevelControl)
    }
  }
}
