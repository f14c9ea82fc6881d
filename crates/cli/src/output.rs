//! CLI output formatting utilities.
//!
//! Status lines go to stderr so that they never mix with what target bodies
//! print on stdout. Listings and JSON go to stdout.

use std::time::Duration;

use anyhow::Context;
use owo_colors::{OwoColorize, Stream};

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
  pub const DEFAULT: &str = "*";
}

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  let millis = duration.subsec_millis();

  if secs >= 60 {
    let mins = secs / 60;
    let remaining_secs = secs % 60;
    format!("{}m {}s", mins, remaining_secs)
  } else if secs > 0 {
    format!("{}.{:02}s", secs, millis / 10)
  } else {
    format!("{}ms", millis)
  }
}

pub fn print_success(message: &str) {
  eprintln!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stderr, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_info(message: &str) {
  eprintln!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stderr, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  eprintln!(
    "  {}: {}",
    label.if_supports_color(Stream::Stderr, |s| s.dimmed()),
    value
  );
}

/// One line of the `help` listing, on stdout.
pub fn print_target(name: &str, width: usize, is_default: bool, help: Option<&str>, requires: &[String]) {
  let marker = if is_default { symbols::DEFAULT } else { " " };
  let padded = format!("{:<width$}", name, width = width);
  let mut line = format!(
    "{} {}",
    marker.if_supports_color(Stream::Stdout, |s| s.green()),
    padded.if_supports_color(Stream::Stdout, |s| s.bold())
  );
  if let Some(help) = help {
    line.push_str(&format!("  {}", help));
  }
  if !requires.is_empty() {
    let requires = format!("({} {})", symbols::ARROW, requires.join(", "));
    line.push_str(&format!("  {}", requires.if_supports_color(Stream::Stdout, |s| s.dimmed())));
  }
  println!("{}", line.trim_end());
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}
