//! Shared constants.

pub const APP_NAME: &str = "trestle";

/// File names searched for in the working directory when no definitions path is given.
pub const DEFAULT_FILE_NAMES: &[&str] = &["trestle.lua", ".trestle.lua"];

/// Positional argument that lists targets instead of running one.
pub const HELP_TARGET: &str = "help";

/// Environment variable naming the definitions file when `--file` is absent.
pub const FILE_ENV: &str = "TRESTLE_FILE";

/// Environment variable holding extra `tracing` filter directives.
pub const LOG_ENV: &str = "TRESTLE_LOG";

/// Environment variable redirecting log output to a file.
pub const LOG_FILE_ENV: &str = "TRESTLE_LOG_FILE";
