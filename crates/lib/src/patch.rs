//! Scoped source tree patching.
//!
//! Kha compiles every source file of a library and offers no way to exclude a
//! directory. When a bundled library ships a file that must not be compiled
//! (e.g. an example `Main.hx`), the file is renamed to a sentinel name while
//! the builder runs and renamed back afterwards.
//!
//! Restoration runs on every exit path. An explicit restore reports failure
//! as [`PatchError::RestoreFailed`]; if the guard is dropped without one
//! (panic, cancelled future) the restore happens in `Drop` and a failure is
//! logged, since `Drop` cannot return it.

use std::future::Future;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error, info};

use crate::plan::TreePatch;

/// Appended to the file name while it is moved aside.
pub const SENTINEL_SUFFIX: &str = ".aura-hidden";

#[derive(Debug, Error)]
pub enum PatchError {
  #[error("failed to move {path} aside: {source}")]
  MoveAside {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("{sentinel} already exists, a previous run did not restore {path}; rename it back and retry")]
  SentinelExists { path: String, sentinel: String },

  #[error("failed to restore {path} from {sentinel}: {source}")]
  RestoreFailed {
    path: String,
    sentinel: String,
    #[source]
    source: std::io::Error,
  },
}

/// Returns the sentinel path for `original`.
pub fn sentinel_path(original: &Path) -> PathBuf {
  let mut name = original.file_name().unwrap_or_default().to_os_string();
  name.push(SENTINEL_SUFFIX);
  original.with_file_name(name)
}

/// A file that has been moved aside and must be put back exactly once.
#[derive(Debug)]
pub struct PatchGuard {
  original: PathBuf,
  sentinel: PathBuf,
  restored: bool,
}

impl PatchGuard {
  /// Move `library/file` aside.
  ///
  /// Returns `None` when the file does not exist, in which case there is
  /// nothing to hide and nothing to restore.
  pub fn acquire(library: &Path, file: &Path) -> Result<Option<Self>, PatchError> {
    let original = library.join(file);
    let sentinel = sentinel_path(&original);

    if sentinel.exists() {
      return Err(PatchError::SentinelExists {
        path: original.display().to_string(),
        sentinel: sentinel.display().to_string(),
      });
    }
    if !original.exists() {
      debug!(path = %original.display(), "nothing to hide");
      return Ok(None);
    }

    std::fs::rename(&original, &sentinel).map_err(|source| PatchError::MoveAside {
      path: original.display().to_string(),
      source,
    })?;
    info!(path = %original.display(), "moved conflicting file aside");

    Ok(Some(Self {
      original,
      sentinel,
      restored: false,
    }))
  }

  /// Put the file back.
  pub fn restore(mut self) -> Result<(), PatchError> {
    self.restored = true;
    self.rename_back()
  }

  fn rename_back(&self) -> Result<(), PatchError> {
    std::fs::rename(&self.sentinel, &self.original).map_err(|source| PatchError::RestoreFailed {
      path: self.original.display().to_string(),
      sentinel: self.sentinel.display().to_string(),
      source,
    })?;
    info!(path = %self.original.display(), "restored conflicting file");
    Ok(())
  }
}

impl Drop for PatchGuard {
  fn drop(&mut self) {
    if self.restored {
      return;
    }
    self.restored = true;
    if let Err(e) = self.rename_back() {
      error!(error = %e, "source tree left patched");
    }
  }
}

/// Every patch of a build plan, held for the duration of one builder run.
#[derive(Debug, Default)]
pub struct PatchSet {
  guards: Vec<PatchGuard>,
}

impl PatchSet {
  /// Apply `patches` in order. If one fails, those already applied are
  /// restored before the error is returned.
  pub fn acquire(patches: &[TreePatch]) -> Result<Self, PatchError> {
    let mut set = PatchSet::default();
    for patch in patches {
      match PatchGuard::acquire(&patch.library, &patch.file) {
        Ok(Some(guard)) => set.guards.push(guard),
        Ok(None) => {}
        Err(e) => {
          set.restore()?;
          return Err(e);
        }
      }
    }
    Ok(set)
  }

  /// Restore every file in reverse order. All restores are attempted; the
  /// first failure is returned.
  pub fn restore(mut self) -> Result<(), PatchError> {
    let mut first_err = None;
    while let Some(guard) = self.guards.pop() {
      if let Err(e) = guard.restore() {
        error!(error = %e, "failed to restore patched file");
        first_err.get_or_insert(e);
      }
    }
    first_err.map_or(Ok(()), Err)
  }
}

/// Run `body` with `library/file` moved out of the build's view.
///
/// The file is restored whatever `body` returns. A failed restore takes
/// precedence over the body's result.
pub fn with_patched_tree<R>(library: &Path, file: &Path, body: impl FnOnce() -> R) -> Result<R, PatchError> {
  let guard = PatchGuard::acquire(library, file)?;
  let result = body();
  if let Some(guard) = guard {
    guard.restore()?;
  }
  Ok(result)
}

/// Like [`with_patched_tree`] for every patch of a plan and an async body.
pub async fn with_patches<F, Fut, R>(patches: &[TreePatch], body: F) -> Result<R, PatchError>
where
  F: FnOnce() -> Fut,
  Fut: Future<Output = R>,
{
  let set = PatchSet::acquire(patches)?;
  let result = body().await;
  set.restore()?;
  Ok(result)
}
