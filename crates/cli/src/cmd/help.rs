//! The `trestle help` target listing.

use trestle_lib::TargetSummary;

use crate::output::{print_info, print_target};

/// Print registered targets in registration order, marking the default.
pub fn print_help_listing(targets: &[TargetSummary]) {
  if targets.is_empty() {
    print_info("no targets are defined");
    return;
  }

  let width = targets.iter().map(|t| t.name.len()).max().unwrap_or(0);
  for target in targets {
    print_target(
      &target.name,
      width,
      target.default,
      target.help.as_deref(),
      &target.requires,
    );
  }
}
