//! Lua runtime for definitions files.
//!
//! Definitions files are trusted Lua 5.4 scripts executed in-process. This
//! module creates the runtime, registers the `trestle` global table, and
//! loads files with a per-file `__dir`.
//!
//! # Submodules
//!
//! - [`globals`] - The `trestle` global table
//! - [`helpers`] - Logging and process helpers callable from target bodies
//! - [`loaders`] - File loading with `__dir` / `__file` injection
//! - [`runtime`] - Lua VM creation
//! - [`state`] - State shared between the runtime and the loader

pub mod globals;
pub mod helpers;
pub mod loaders;
pub mod runtime;
pub mod state;
