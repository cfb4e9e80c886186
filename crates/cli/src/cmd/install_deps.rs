use std::path::Path;

use anyhow::{Context, Result};

use aurabuild_lib::AuraError;
use aurabuild_lib::config::{self, OrchestratorConfig};
use aurabuild_lib::deps::ensure_installed;
use aurabuild_lib::process::ConsoleSink;

use crate::output::{print_info, print_success};

pub fn cmd_install_deps(project_dir: &Path) -> Result<()> {
  let project_dir = config::project_dir(project_dir);
  let config = OrchestratorConfig::discover(&project_dir)?;

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let installed = rt
    .block_on(ensure_installed(&project_dir, &config.deps, &ConsoleSink))
    .map_err(AuraError::from)?;

  if installed {
    print_success("Installed dependencies");
  } else {
    print_info(&format!(
      "Dependencies already installed ({} exists)",
      project_dir.join(&config.deps.marker).display()
    ));
  }
  Ok(())
}
