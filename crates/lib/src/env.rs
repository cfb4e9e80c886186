//! Environment access.
//!
//! The environment is captured once into an [`EnvSnapshot`] and treated as
//! static for the lifetime of the process. Everything downstream reads the
//! snapshot, never `std::env` directly, so plan resolution stays a function of
//! its inputs.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::ConfigError;

/// A read-only copy of the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
  vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
  /// Capture the current process environment.
  ///
  /// Variables whose name or value is not valid unicode are skipped.
  pub fn capture() -> Self {
    let vars = std::env::vars_os()
      .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
      .collect();
    Self { vars }
  }

  pub fn from_pairs<I, K, V>(pairs: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    Self {
      vars: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
    }
  }

  /// Returns the value of `name`, failing with [`ConfigError::MissingEnvVar`] if unset.
  pub fn get(&self, name: &str) -> Result<&str, ConfigError> {
    self.get_optional(name).ok_or_else(|| ConfigError::MissingEnvVar {
      name: name.to_string(),
    })
  }

  pub fn get_optional(&self, name: &str) -> Option<&str> {
    self.vars.get(name).map(String::as_str)
  }

  /// Like [`EnvSnapshot::get`], returning the value as a path.
  pub fn get_path(&self, name: &str) -> Result<PathBuf, ConfigError> {
    self.get(name).map(PathBuf::from)
  }
}
