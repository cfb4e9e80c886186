//! Presence-only command line switches.
//!
//! None of these take a value. Absence means the feature is enabled.

pub const NO_BACKEND: &str = "-aura-no-backend";
pub const NO_SIMD: &str = "--aura-no-simd";

/// Switches in the order they were given, forwarded to the builder as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliFlags {
  tokens: Vec<String>,
}

impl CliFlags {
  pub fn from_args<I, S>(args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      tokens: args.into_iter().map(Into::into).collect(),
    }
  }

  pub fn has(&self, token: &str) -> bool {
    self.tokens.iter().any(|t| t == token)
  }

  pub fn tokens(&self) -> impl Iterator<Item = &str> {
    self.tokens.iter().map(String::as_str)
  }

  pub fn no_backend(&self) -> bool {
    self.has(NO_BACKEND)
  }

  pub fn no_simd(&self) -> bool {
    self.has(NO_SIMD)
  }
}
