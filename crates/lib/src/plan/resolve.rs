//! Build plan resolution.
//!
//! Steps run in a fixed order and only ever add to the plan:
//! 1. primary source root
//! 2. backend selection, or `AURA_NO_BACKEND` when `-aura-no-backend` is given
//! 3. SIMD gating on native targets
//! 4. optional Optick integration

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::bridge;
use crate::consts::AURA_OPTICK_PATH;
use crate::env::EnvSnapshot;
use crate::flags::CliFlags;
use crate::platform::{PlatformFamily, PlatformId};

use super::preset::Capabilities;
use super::types::{BuildPlan, BuildPlanBuilder, LibraryRef, TreePatch};

pub const SOURCES_DIR: &str = "Sources";
pub const BACKENDS_DIR: &str = "Backends";
pub const HL_LIBRARY: &str = "hl";

pub const DEFINE_BACKEND_HL: &str = "AURA_BACKEND_HL";
pub const DEFINE_NO_BACKEND: &str = "AURA_NO_BACKEND";
pub const DEFINE_SIMD: &str = "AURA_USE_SIMD";
pub const DEFINE_OPTICK: &str = "AURA_WITH_OPTICK";

pub const OPTICK_LIBRARY: &str = "optick";
pub const OPTICK_C_DEFINE: &str = "USE_OPTICK=1";
/// Haxe has no metadata to add a header include to a single function, so the
/// Optick header is injected into every type of the `aura` package.
pub const OPTICK_HEADER_MACRO: &str =
  "--macro addGlobalMetadata(\"aura\", \"@:headerCode('#include <optick.h>')\", true, true, false)";
/// The Optick bindings ship an example `Main.hx` that would be compiled as part
/// of the build, since Kha cannot exclude directories of a library.
pub const OPTICK_CONFLICTING_FILE: &str = "Sources/Main.hx";

/// Turns (platform, flags, environment) into a [`BuildPlan`].
#[derive(Debug, Clone)]
pub struct BuildPlanResolver {
  capabilities: Capabilities,
  project_root: PathBuf,
  working_dir: PathBuf,
}

impl BuildPlanResolver {
  pub fn new(capabilities: Capabilities) -> Self {
    Self {
      capabilities,
      project_root: PathBuf::new(),
      working_dir: PathBuf::new(),
    }
  }

  /// Resolve project-relative paths against `root` instead of the working directory.
  pub fn with_project_root(mut self, root: &Path) -> Self {
    self.project_root = root.to_path_buf();
    self
  }

  /// The directory the builder runs in. Relative paths read from the
  /// environment resolve against it.
  pub fn with_working_dir(mut self, dir: &Path) -> Self {
    self.working_dir = dir.to_path_buf();
    self
  }

  pub fn resolve(&self, platform: &PlatformId, flags: &CliFlags, env: &EnvSnapshot) -> BuildPlan {
    let mut builder = BuildPlanBuilder::new(platform.clone());
    self.apply(&mut builder, flags, env);
    builder.finish()
  }

  /// Run every resolution step against an existing builder.
  pub fn apply(&self, builder: &mut BuildPlanBuilder, flags: &CliFlags, env: &EnvSnapshot) {
    let platform = builder.platform().clone();
    builder.add_source(self.project_root.join(SOURCES_DIR));

    if flags.no_backend() {
      debug!(platform = %platform, "backend selection disabled");
      builder.add_define(DEFINE_NO_BACKEND);
    } else {
      self.add_backend(builder, &platform);
    }

    if self.capabilities.has_simd_gate && platform.family() == PlatformFamily::Native && !flags.no_simd() {
      builder.add_define(DEFINE_SIMD);
    }

    if self.capabilities.has_optick {
      self.add_optick(builder, env);
    }
  }

  fn add_backend(&self, builder: &mut BuildPlanBuilder, platform: &PlatformId) {
    match platform.family() {
      PlatformFamily::VmBackend => {
        builder
          .add_library(LibraryRef::at(HL_LIBRARY, self.project_root.join(BACKENDS_DIR)))
          .add_define(DEFINE_BACKEND_HL);
        info!("[Aura] Added HL/C backend");
      }
      PlatformFamily::Web => {
        debug!(platform = %platform, "no backend sources for web targets");
      }
      PlatformFamily::Native | PlatformFamily::Unknown => {}
    }
  }

  fn add_optick(&self, builder: &mut BuildPlanBuilder, env: &EnvSnapshot) {
    let Some(raw) = env.get_optional(AURA_OPTICK_PATH) else {
      return;
    };
    let path = self.working_dir.join(raw);
    if !path.exists() {
      warn!(
        path = %path.display(),
        "{} is set but does not exist, building without Optick", AURA_OPTICK_PATH
      );
      return;
    }

    info!(path = %path.display(), "integrating Optick profiler");
    let sub = optick_sub_plan(builder.platform(), &path);
    builder
      .add_define(DEFINE_OPTICK)
      .merge(&sub)
      .add_parameter(OPTICK_HEADER_MACRO);

    if self.capabilities.has_library_patch {
      builder.add_patch(TreePatch {
        library: path,
        file: PathBuf::from(OPTICK_CONFLICTING_FILE),
      });
    }
  }
}

/// The profiler's own contribution to the build.
fn optick_sub_plan(platform: &PlatformId, path: &Path) -> BuildPlan {
  let mut sub = BuildPlanBuilder::new(platform.clone());
  sub
    .add_library(LibraryRef::at(OPTICK_LIBRARY, path))
    .add_c_define(OPTICK_C_DEFINE);
  sub.finish()
}

pub const UTEST_LIBRARY: &str = "utest";
pub const INSTRUMENT_LIBRARY: &str = "instrument";
pub const COVERAGE_MACRO: &str = "--macro instrument.Instrumentation.coverage(['aura'], null, ['auratests'])";

/// Options for the unit test build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestPlanOptions {
  /// Collect coverage through the `instrument` library.
  pub coverage: bool,
  /// Location of the Aura project relative to the test project.
  pub aura_root: PathBuf,
  /// Where the builder runs; see [`BuildPlanResolver::with_working_dir`].
  pub working_dir: PathBuf,
}

impl Default for TestPlanOptions {
  fn default() -> Self {
    Self {
      coverage: true,
      aura_root: PathBuf::from(".."),
      working_dir: PathBuf::new(),
    }
  }
}

/// Resolve the plan for the unit test build (`debug-html5`).
///
/// The Aura project plan is merged below the test sources, then the test
/// harness libraries, coverage instrumentation and the logging bridge are
/// layered on top.
pub fn resolve_test_plan(
  capabilities: Capabilities,
  flags: &CliFlags,
  env: &EnvSnapshot,
  options: &TestPlanOptions,
) -> BuildPlan {
  let platform = PlatformId::DebugHtml5;
  let project = BuildPlanResolver::new(capabilities)
    .with_project_root(&options.aura_root)
    .with_working_dir(&options.working_dir)
    .resolve(&platform, flags, env);

  let mut builder = BuildPlanBuilder::new(platform);
  builder
    .add_source(".")
    .merge(&project)
    .add_library(LibraryRef::named(UTEST_LIBRARY))
    .add_define("UTEST_PRINT_TESTS");

  if options.coverage {
    builder
      .add_library(LibraryRef::named(INSTRUMENT_LIBRARY))
      .add_define("instrument_quiet")
      .add_define("coverage-console-package-summary-reporter")
      .add_parameter(COVERAGE_MACRO);
  }

  builder
    .append_target_option(bridge::EXPOSE_OPTION, &bridge::expose_entry())
    .add_parameter("--no-opt")
    .add_parameter("--no-inline")
    .add_parameter("-dce full")
    .add_define("AURA_UNIT_TESTS")
    .add_define("AURA_ASSERT_LEVEL=Debug")
    // Wayland headers are missing on CI.
    .add_c_define("KINC_NO_WAYLAND");

  builder.finish()
}
