//! Named capability sets.
//!
//! Aura's build script went through several generations that differed only in
//! which optional steps they performed. Each generation is a [`Preset`] over a
//! single resolver instead of a separate code path.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Optional resolution steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
  /// Integrate the Optick profiler when `AURA_OPTICK_PATH` points at an installation.
  pub has_optick: bool,
  /// Add the SIMD define on native targets unless `--aura-no-simd` is given.
  pub has_simd_gate: bool,
  /// Hide the profiler library's example entry point while the builder runs.
  pub has_library_patch: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
  /// Backend selection only.
  Legacy,
  Simd,
  #[default]
  Current,
}

impl Preset {
  pub const ALL: [Preset; 3] = [Preset::Legacy, Preset::Simd, Preset::Current];

  pub fn capabilities(self) -> Capabilities {
    match self {
      Preset::Legacy => Capabilities {
        has_optick: false,
        has_simd_gate: false,
        has_library_patch: false,
      },
      Preset::Simd => Capabilities {
        has_optick: false,
        has_simd_gate: true,
        has_library_patch: false,
      },
      Preset::Current => Capabilities {
        has_optick: true,
        has_simd_gate: true,
        has_library_patch: true,
      },
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Preset::Legacy => "legacy",
      Preset::Simd => "simd",
      Preset::Current => "current",
    }
  }
}

impl fmt::Display for Preset {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Preset {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Preset::ALL
      .into_iter()
      .find(|p| p.as_str() == s)
      .ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
  }
}
