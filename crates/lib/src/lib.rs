//! trestle-lib: target registration, resolution and execution for trestle
//!
//! This crate provides the engine behind the `trestle` command:
//! - `TargetDef` / `TargetRegistry`: named units of work and their prerequisites
//! - `resolve`: dependency-ordered, deduplicated plans with cycle detection
//! - `execute`: fail-fast, in-order execution of a plan
//! - `eval`: loading a Lua definitions file into a fresh registry
//! - `Dispatcher`: the load → resolve → execute state machine behind the CLI

pub mod config;
pub mod consts;
pub mod dispatch;
pub mod eval;
pub mod execute;
pub mod logging;
pub mod lua;
pub mod registry;
pub mod resolve;
pub mod session;
pub mod target;
pub mod util;

pub use dispatch::{Args, DispatchError, Dispatcher, ErrorKind, Outcome, OutputFormat, Stage};
pub use execute::{ExecuteError, ExecutionSummary, execute};
pub use registry::{RegistryError, TargetRegistry};
pub use resolve::{Plan, ResolveError, resolve};
pub use session::{Mode, Session, Verbosity};
pub use target::{BodyError, BodyResult, TargetBody, TargetDef, TargetSummary};
