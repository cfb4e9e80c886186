//! The unit test workflow.
//!
//! ```text
//! Start -> DepsChecked -> Built -> RuntimeLaunched -> Done
//! ```
//!
//! Each stage runs only after the previous one succeeded, and at most one
//! external process runs at a time: the runtime must never start against a
//! partial build. Any failure aborts the run and is returned to the caller,
//! which owns the decision to terminate the process. Every child here runs
//! with `exit_on_error`, so no failure is recoverable.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::OrchestratorConfig;
use crate::consts::{AURA_BUILD_PLAN, ELECTRON_BIN, KHA_PATH, PLAN_FILENAME};
use crate::deps;
use crate::env::EnvSnapshot;
use crate::error::{AuraError, ConfigError};
use crate::flags::CliFlags;
use crate::patch;
use crate::plan::{BuildPlan, TestPlanOptions, resolve_test_plan};
use crate::process::{CommandSpec, LineSink, run_command};
use crate::staging::{StagedAssets, stage_test_assets};

/// Flags that keep Electron deterministic on headless CI machines.
pub const RUNTIME_FLAGS: [&str; 3] = ["--no-sandbox", "--force-device-scale-factor=1", "--force_low_power_gpu"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
  Start,
  DepsChecked,
  Built,
  RuntimeLaunched,
  Done,
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Stage::Start => "start",
      Stage::DepsChecked => "deps-checked",
      Stage::Built => "built",
      Stage::RuntimeLaunched => "runtime-launched",
      Stage::Done => "done",
    };
    f.write_str(name)
  }
}

/// Summary of a successful run.
#[derive(Debug, Clone)]
pub struct TestReport {
  pub installed_deps: bool,
  pub plan: BuildPlan,
  pub plan_path: PathBuf,
  pub staged: StagedAssets,
  pub stage: Stage,
}

/// Paths taken from the environment, resolved before anything is spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Executables {
  kha: PathBuf,
  electron: PathBuf,
}

#[derive(Debug, Clone)]
pub struct TestOrchestrator {
  project_dir: PathBuf,
  config: OrchestratorConfig,
  flags: CliFlags,
  env: EnvSnapshot,
}

impl TestOrchestrator {
  pub fn new(project_dir: &Path, config: OrchestratorConfig, flags: CliFlags, env: EnvSnapshot) -> Self {
    Self {
      project_dir: project_dir.to_path_buf(),
      config,
      flags,
      env,
    }
  }

  /// Run the whole workflow.
  pub async fn run(&self, sink: &dyn LineSink) -> Result<TestReport, AuraError> {
    let exes = Executables {
      kha: self.env.get_path(KHA_PATH)?,
      electron: self.env.get_path(ELECTRON_BIN)?,
    };
    self.enter(Stage::Start);

    let installed_deps = deps::ensure_installed(&self.project_dir, &self.config.deps, sink).await?;
    self.enter(Stage::DepsChecked);

    let plan = self.resolve_plan();
    let plan_path = self.write_plan(&plan)?;
    let builder = self.builder_command(&exes.kha, &plan, &plan_path);
    patch::with_patches(plan.patches(), || run_command(&builder, true, sink)).await??;

    let out_dir = self.project_dir.join(&self.config.build_dir);
    let harness = self.project_dir.join(&self.config.harness);
    let staged = stage_test_assets(&harness, &out_dir, &self.config.bridge_script).await?;
    self.enter(Stage::Built);

    let runtime = self.runtime_command(&exes.electron);
    self.enter(Stage::RuntimeLaunched);
    run_command(&runtime, true, sink).await?;
    self.enter(Stage::Done);

    Ok(TestReport {
      installed_deps,
      plan,
      plan_path,
      staged,
      stage: Stage::Done,
    })
  }

  pub fn resolve_plan(&self) -> BuildPlan {
    let options = TestPlanOptions {
      coverage: self.config.coverage,
      aura_root: self.config.aura_root.clone(),
      working_dir: self.project_dir.clone(),
    };
    resolve_test_plan(self.config.preset.capabilities(), &self.flags, &self.env, &options)
  }

  fn write_plan(&self, plan: &BuildPlan) -> Result<PathBuf, ConfigError> {
    let dir = self.project_dir.join(&self.config.build_dir);
    let path = dir.join(PLAN_FILENAME);
    let write_err = |message: String| ConfigError::WritePlan {
      path: path.clone(),
      message,
    };
    let json = plan.to_json().map_err(|e| write_err(e.to_string()))?;
    std::fs::create_dir_all(&dir).map_err(|e| write_err(e.to_string()))?;
    std::fs::write(&path, json).map_err(|e| write_err(e.to_string()))?;
    Ok(path)
  }

  /// `<KHA_PATH> make <platform> --debug [flags]`, or
  /// `<launcher> <KHA_PATH>/make <platform> --debug [flags]` with a launcher.
  fn builder_command(&self, kha: &Path, plan: &BuildPlan, plan_path: &Path) -> CommandSpec {
    let spec = match &self.config.builder.launcher {
      Some(launcher) => CommandSpec::new(launcher).arg(kha.join("make").display().to_string()),
      None => CommandSpec::new(kha).arg("make"),
    };
    spec
      .arg(plan.platform().token())
      .arg("--debug")
      .args(self.flags.tokens())
      .with_cwd(&self.project_dir)
      .with_env(AURA_BUILD_PLAN, plan_path.display().to_string())
  }

  fn runtime_command(&self, electron: &Path) -> CommandSpec {
    let entry = self.config.build_dir.join(&self.config.bridge_script);
    CommandSpec::new(electron)
      .args(RUNTIME_FLAGS)
      .arg(entry.display().to_string())
      .with_cwd(&self.project_dir)
  }

  fn enter(&self, stage: Stage) {
    info!(stage = %stage, "test run");
  }
}
