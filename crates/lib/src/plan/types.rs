use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::platform::PlatformId;

/// A library the build links against, optionally from an explicit location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LibraryRef {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub path: Option<PathBuf>,
}

impl LibraryRef {
  pub fn named(name: &str) -> Self {
    Self {
      name: name.to_string(),
      path: None,
    }
  }

  pub fn at(name: &str, path: impl Into<PathBuf>) -> Self {
    Self {
      name: name.to_string(),
      path: Some(path.into()),
    }
  }
}

/// A file inside a third-party library that must be hidden while the builder runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TreePatch {
  pub library: PathBuf,
  pub file: PathBuf,
}

/// The resolved configuration for one build invocation.
///
/// Only [`BuildPlanBuilder`] can create one, and it is read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
  platform: PlatformId,
  source_roots: Vec<PathBuf>,
  libraries: Vec<LibraryRef>,
  defines: BTreeSet<String>,
  c_defines: BTreeSet<String>,
  macro_parameters: Vec<String>,
  target_options: BTreeMap<String, String>,
  patches: Vec<TreePatch>,
}

impl BuildPlan {
  pub fn platform(&self) -> &PlatformId {
    &self.platform
  }

  pub fn source_roots(&self) -> &[PathBuf] {
    &self.source_roots
  }

  pub fn libraries(&self) -> &[LibraryRef] {
    &self.libraries
  }

  pub fn has_library(&self, name: &str) -> bool {
    self.libraries.iter().any(|l| l.name == name)
  }

  pub fn defines(&self) -> &BTreeSet<String> {
    &self.defines
  }

  pub fn has_define(&self, define: &str) -> bool {
    self.defines.contains(define)
  }

  pub fn c_defines(&self) -> &BTreeSet<String> {
    &self.c_defines
  }

  pub fn macro_parameters(&self) -> &[String] {
    &self.macro_parameters
  }

  pub fn target_options(&self) -> &BTreeMap<String, String> {
    &self.target_options
  }

  pub fn target_option(&self, key: &str) -> Option<&str> {
    self.target_options.get(key).map(String::as_str)
  }

  pub fn patches(&self) -> &[TreePatch] {
    &self.patches
  }

  pub fn to_json(&self) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(self)
  }
}

/// Append-only construction of a [`BuildPlan`].
///
/// Nothing added can be taken out again, so later resolution steps cannot
/// disturb the positional order established by earlier ones.
#[derive(Debug, Clone)]
pub struct BuildPlanBuilder {
  plan: BuildPlan,
}

impl BuildPlanBuilder {
  pub fn new(platform: PlatformId) -> Self {
    Self {
      plan: BuildPlan {
        platform,
        source_roots: Vec::new(),
        libraries: Vec::new(),
        defines: BTreeSet::new(),
        c_defines: BTreeSet::new(),
        macro_parameters: Vec::new(),
        target_options: BTreeMap::new(),
        patches: Vec::new(),
      },
    }
  }

  pub fn platform(&self) -> &PlatformId {
    &self.plan.platform
  }

  pub fn add_source(&mut self, root: impl AsRef<Path>) -> &mut Self {
    self.plan.source_roots.push(root.as_ref().to_path_buf());
    self
  }

  pub fn add_library(&mut self, library: LibraryRef) -> &mut Self {
    self.plan.libraries.push(library);
    self
  }

  pub fn add_define(&mut self, define: &str) -> &mut Self {
    self.plan.defines.insert(define.to_string());
    self
  }

  pub fn add_c_define(&mut self, define: &str) -> &mut Self {
    self.plan.c_defines.insert(define.to_string());
    self
  }

  pub fn add_parameter(&mut self, parameter: &str) -> &mut Self {
    self.plan.macro_parameters.push(parameter.to_string());
    self
  }

  /// Append `snippet` to the target option `key`, starting from an empty value.
  pub fn append_target_option(&mut self, key: &str, snippet: &str) -> &mut Self {
    self.plan.target_options.entry(key.to_string()).or_default().push_str(snippet);
    self
  }

  pub fn add_patch(&mut self, patch: TreePatch) -> &mut Self {
    if !self.plan.patches.contains(&patch) {
      self.plan.patches.push(patch);
    }
    self
  }

  /// Union `other` into this plan.
  ///
  /// Source roots and libraries keep their first position and are not
  /// repeated. Macro parameters are appended as-is since their order is
  /// significant. The platform of `other` is ignored.
  pub fn merge(&mut self, other: &BuildPlan) -> &mut Self {
    for root in &other.source_roots {
      if !self.plan.source_roots.contains(root) {
        self.plan.source_roots.push(root.clone());
      }
    }
    for library in &other.libraries {
      if !self.plan.libraries.contains(library) {
        self.plan.libraries.push(library.clone());
      }
    }
    self.plan.defines.extend(other.defines.iter().cloned());
    self.plan.c_defines.extend(other.c_defines.iter().cloned());
    self.plan.macro_parameters.extend(other.macro_parameters.iter().cloned());
    for (key, value) in &other.target_options {
      self.append_target_option(key, value);
    }
    for patch in &other.patches {
      self.add_patch(patch.clone());
    }
    self
  }

  pub fn finish(self) -> BuildPlan {
    self.plan
  }
}
