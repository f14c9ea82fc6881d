//! Helpers exposed to definitions files under the `trestle` table.

pub mod log;
pub mod process;
