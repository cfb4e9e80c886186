//! Post-build asset staging for the Electron test runtime.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::bridge;

#[derive(Debug, Error)]
pub enum StagingError {
  #[error("failed to create {path}: {source}")]
  CreateDir {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to copy {from} to {to}: {source}")]
  Copy {
    from: String,
    to: String,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to append logging bridge to {path}: {source}")]
  Append {
    path: String,
    #[source]
    source: std::io::Error,
  },
}

/// Where the staged files ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedAssets {
  pub harness: PathBuf,
  pub bridge_script: PathBuf,
}

/// Copy the HTML harness into `out_dir` and append the logging bridge to the
/// generated runtime script.
///
/// The runtime script is created if the builder did not produce one.
pub async fn stage_test_assets(
  harness: &Path,
  out_dir: &Path,
  bridge_script: &str,
) -> Result<StagedAssets, StagingError> {
  tokio::fs::create_dir_all(out_dir)
    .await
    .map_err(|source| StagingError::CreateDir {
      path: out_dir.display().to_string(),
      source,
    })?;

  let harness_name = harness.file_name().unwrap_or_else(|| "index.html".as_ref());
  let staged_harness = out_dir.join(harness_name);
  tokio::fs::copy(harness, &staged_harness)
    .await
    .map_err(|source| StagingError::Copy {
      from: harness.display().to_string(),
      to: staged_harness.display().to_string(),
      source,
    })?;
  info!(path = %staged_harness.display(), "staged test harness");

  let script = out_dir.join(bridge_script);
  append_bridge(&script).await.map_err(|source| StagingError::Append {
    path: script.display().to_string(),
    source,
  })?;
  info!(path = %script.display(), "appended logging bridge");

  Ok(StagedAssets {
    harness: staged_harness,
    bridge_script: script,
  })
}

async fn append_bridge(script: &Path) -> std::io::Result<()> {
  let mut file = tokio::fs::OpenOptions::new()
    .create(true)
    .append(true)
    .open(script)
    .await?;
  file.write_all(b"\n\n").await?;
  file.write_all(bridge::main_process_snippet().as_bytes()).await?;
  file.flush().await
}
