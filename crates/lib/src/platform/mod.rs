//! Build target identifiers.
//!
//! A [`PlatformId`] names the output Kha produces: a native C target, the
//! HashLink VM backend on some OS, or a browser/Electron target. Tokens that
//! match none of these are kept as [`PlatformId::Unknown`] so newer targets
//! degrade to a plain build instead of failing.

pub mod os;

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

pub use os::TargetOs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlatformFamily {
  Native,
  VmBackend,
  Web,
  Unknown,
}

impl PlatformFamily {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Native => "native",
      Self::VmBackend => "vm-backend",
      Self::Web => "web",
      Self::Unknown => "unknown",
    }
  }
}

impl fmt::Display for PlatformFamily {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlatformId {
  /// Native C output through Kinc, e.g. `linux`.
  Native(TargetOs),
  /// HashLink/C output, e.g. `linux-hl`.
  Hl(TargetOs),
  Html5,
  /// Unoptimized HTML5 build hosted in Electron, used by the test runner.
  DebugHtml5,
  Unknown(String),
}

impl PlatformId {
  /// All recognized platforms, in the order they are listed to users.
  pub fn known() -> Vec<PlatformId> {
    let mut all: Vec<PlatformId> = TargetOs::ALL.into_iter().map(PlatformId::Native).collect();
    all.extend(TargetOs::ALL.into_iter().map(PlatformId::Hl));
    all.push(PlatformId::Html5);
    all.push(PlatformId::DebugHtml5);
    all
  }

  /// Parse a single token. Never fails: unrecognized tokens become `Unknown`.
  pub fn from_token(token: &str) -> Self {
    if let Some(os) = TargetOs::from_token(token) {
      return PlatformId::Native(os);
    }
    if let Some(os) = token.strip_suffix("-hl").and_then(TargetOs::from_token) {
      return PlatformId::Hl(os);
    }
    match token {
      "html5" => PlatformId::Html5,
      "debug-html5" => PlatformId::DebugHtml5,
      other => PlatformId::Unknown(other.to_string()),
    }
  }

  /// Pick the first known platform token among process arguments.
  pub fn from_args<S: AsRef<str>>(args: &[S]) -> Option<Self> {
    args
      .iter()
      .map(|a| PlatformId::from_token(a.as_ref()))
      .find(|p| !matches!(p, PlatformId::Unknown(_)))
  }

  pub fn family(&self) -> PlatformFamily {
    match self {
      PlatformId::Native(_) => PlatformFamily::Native,
      PlatformId::Hl(_) => PlatformFamily::VmBackend,
      PlatformId::Html5 | PlatformId::DebugHtml5 => PlatformFamily::Web,
      PlatformId::Unknown(_) => PlatformFamily::Unknown,
    }
  }

  /// The token Kha expects on its command line.
  pub fn token(&self) -> String {
    match self {
      PlatformId::Native(os) => os.as_str().to_string(),
      PlatformId::Hl(os) => format!("{}-hl", os),
      PlatformId::Html5 => "html5".to_string(),
      PlatformId::DebugHtml5 => "debug-html5".to_string(),
      PlatformId::Unknown(token) => token.clone(),
    }
  }
}

impl fmt::Display for PlatformId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.token())
  }
}

impl FromStr for PlatformId {
  type Err = std::convert::Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Ok(PlatformId::from_token(s))
  }
}

impl Serialize for PlatformId {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&self.token())
  }
}
