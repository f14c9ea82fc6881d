mod help;
mod run;

pub use help::print_help_listing;
pub use run::cmd_run;
