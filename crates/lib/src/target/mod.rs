//! Target definitions.
//!
//! A target is a named unit of work: a body plus an ordered list of
//! prerequisite targets that must complete before the body runs. Targets are
//! declared while a definitions file is loading and are immutable afterwards.
//!
//! # Submodules
//!
//! - [`lua`] - `trestle.target{}` and the `targets` table exposed to definitions files

pub mod lua;
mod types;

pub use types::*;
