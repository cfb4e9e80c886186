//! Third-party dependency installation.
//!
//! Dependencies are fetched into a local haxelib repository inside the
//! project. The repository directory doubles as the marker that the install
//! already happened.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::process::{CommandSpec, LineSink, ProcessError, run_command};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DepsConfig {
  /// Installer executable.
  pub installer: PathBuf,
  /// Dependency manifest passed to the installer.
  pub manifest: String,
  /// Directory whose existence means dependencies are installed.
  pub marker: PathBuf,
}

impl Default for DepsConfig {
  fn default() -> Self {
    Self {
      installer: PathBuf::from("haxelib"),
      manifest: "TestDeps.hxml".to_string(),
      marker: PathBuf::from(".haxelib"),
    }
  }
}

/// Make sure dependencies are present in `project_dir`.
///
/// Returns `true` when the installer ran. Both installer steps are run with
/// `exit_on_error`, since a half-installed repository is not something to
/// continue from.
pub async fn ensure_installed(
  project_dir: &Path,
  config: &DepsConfig,
  sink: &dyn LineSink,
) -> Result<bool, ProcessError> {
  let marker = project_dir.join(&config.marker);
  if marker.exists() {
    debug!(marker = %marker.display(), "dependencies already installed");
    return Ok(false);
  }

  info!(installer = %config.installer.display(), "Downloading haxelib dependencies...");

  let newrepo = CommandSpec::new(&config.installer)
    .arg("newrepo")
    .with_cwd(project_dir);
  run_command(&newrepo, true, sink).await?;

  let install = CommandSpec::new(&config.installer)
    .args(["install", config.manifest.as_str(), "--always"])
    .with_cwd(project_dir);
  run_command(&install, true, sink).await?;

  Ok(true)
}
