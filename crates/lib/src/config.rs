//! Orchestrator configuration.
//!
//! Read from an optional `aurabuild.toml` in the test project directory. Every
//! field has a default, so an empty or missing file describes the standard
//! Aura test setup.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::consts::CONFIG_FILENAME;
use crate::deps::DepsConfig;
use crate::error::ConfigError;
use crate::plan::Preset;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuilderConfig {
  /// Interpreter to run the builder with, e.g. `node`. When set, the builder
  /// is invoked as `<launcher> <KHA_PATH>/make`; otherwise `KHA_PATH` is
  /// executed directly.
  pub launcher: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrchestratorConfig {
  /// Builder output directory, relative to the project directory.
  pub build_dir: PathBuf,
  /// HTML page copied into `build_dir` after the build.
  pub harness: PathBuf,
  /// Generated runtime script inside `build_dir` that receives the logging bridge.
  pub bridge_script: String,
  /// Aura project location relative to the project directory.
  pub aura_root: PathBuf,
  pub preset: Preset,
  pub coverage: bool,
  pub deps: DepsConfig,
  pub builder: BuilderConfig,
}

impl Default for OrchestratorConfig {
  fn default() -> Self {
    Self {
      build_dir: PathBuf::from("build/debug-html5"),
      harness: PathBuf::from("Data/index.html"),
      bridge_script: "electron.js".to_string(),
      aura_root: PathBuf::from(".."),
      preset: Preset::default(),
      coverage: true,
      deps: DepsConfig::default(),
      builder: BuilderConfig::default(),
    }
  }
}

impl OrchestratorConfig {
  pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::InvalidConfig {
      path: path.to_path_buf(),
      message: e.to_string(),
    })
  }

  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadConfig {
      path: path.to_path_buf(),
      source,
    })?;
    Self::parse(&content, path)
  }

  /// Load `aurabuild.toml` from `project_dir`, or the defaults if there is none.
  pub fn discover(project_dir: &Path) -> Result<Self, ConfigError> {
    let path = project_dir.join(CONFIG_FILENAME);
    if path.exists() {
      debug!(path = %path.display(), "loading config");
      Self::load(&path)
    } else {
      debug!(dir = %project_dir.display(), "no config file, using defaults");
      Ok(Self::default())
    }
  }
}

/// Canonical form of the project directory, without `\\?\` prefixes on Windows.
pub fn project_dir(path: &Path) -> PathBuf {
  dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
