use std::fmt;

/// Operating systems a Kha build can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetOs {
  Windows,
  Linux,
  Osx,
  Android,
  Ios,
}

impl TargetOs {
  pub const ALL: [TargetOs; 5] = [
    TargetOs::Windows,
    TargetOs::Linux,
    TargetOs::Osx,
    TargetOs::Android,
    TargetOs::Ios,
  ];

  /// Returns the lowercase identifier Kha uses for this OS
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Windows => "windows",
      Self::Linux => "linux",
      Self::Osx => "osx",
      Self::Android => "android",
      Self::Ios => "ios",
    }
  }

  pub fn from_token(token: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|os| os.as_str() == token)
  }
}

impl fmt::Display for TargetOs {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
