//! aurabuild-lib: build configuration and test orchestration for Aura
//!
//! This crate provides:
//! - `plan`: resolving a platform, switches and environment into a `BuildPlan`
//! - `process`: running the external builder and runtime with live output
//! - `deps`: one-time haxelib dependency installation
//! - `patch`: hiding conflicting library files while the builder runs
//! - `orchestrate`: the install, build, stage, run sequence for unit tests

pub mod bridge;
pub mod config;
pub mod consts;
pub mod deps;
pub mod env;
pub mod error;
pub mod flags;
pub mod orchestrate;
pub mod patch;
pub mod plan;
pub mod platform;
pub mod process;
pub mod staging;
pub mod util;

pub use error::{AuraError, ConfigError};
