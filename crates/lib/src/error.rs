//! Error taxonomy shared across the orchestrator.
//!
//! Each component has its own error enum. [`AuraError`] unifies them for the
//! top level, which is the only place that turns an error into a process exit
//! code.

use std::path::PathBuf;

use thiserror::Error;

use crate::patch::PatchError;
use crate::process::ProcessError;
use crate::staging::StagingError;

/// Configuration problems, detected before any external process is spawned.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Environment variable '{name}' not set!")]
  MissingEnvVar { name: String },

  #[error("failed to read config {path}: {source}")]
  ReadConfig {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid config {path}: {message}")]
  InvalidConfig { path: PathBuf, message: String },

  #[error("unknown preset '{0}' (expected one of: legacy, simd, current)")]
  UnknownPreset(String),

  #[error("failed to write build plan {path}: {message}")]
  WritePlan { path: PathBuf, message: String },
}

#[derive(Debug, Error)]
pub enum AuraError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Process(#[from] ProcessError),

  #[error(transparent)]
  Patch(#[from] PatchError),

  #[error(transparent)]
  Staging(#[from] StagingError),
}

impl AuraError {
  /// The exit code the whole run should terminate with.
  ///
  /// A failed child propagates its own code. Everything else is 1.
  pub fn exit_code(&self) -> i32 {
    match self {
      AuraError::Process(err) => err.exit_code(),
      _ => 1,
    }
  }
}
