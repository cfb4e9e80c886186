//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Isolated test project.
///
/// Lays out a `Tests/` project with the HTML harness, plus a `bin/` directory
/// for fake builder, runtime and installer scripts.
pub struct TestEnv {
  pub temp: TempDir,
  pub project: PathBuf,
}

impl TestEnv {
  /// A project whose dependencies are already installed.
  pub fn new() -> Self {
    let env = Self::without_deps();
    std::fs::create_dir_all(env.project.join(".haxelib")).unwrap();
    env
  }

  /// A project with no `.haxelib` marker.
  pub fn without_deps() -> Self {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("Tests");
    std::fs::create_dir_all(project.join("Data")).unwrap();
    std::fs::create_dir_all(temp.path().join("bin")).unwrap();
    std::fs::write(project.join("Data").join("index.html"), "<html></html>").unwrap();
    Self { temp, project }
  }

  /// Write a file relative to the project directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.project.join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// Create an executable script in `bin/` that records its invocation in
  /// `calls.log` (relative to its working directory) and exits with `code`.
  pub fn fake(&self, name: &str, code: i32) -> PathBuf {
    self.script(name, &format!("echo \"{} $@\" >> calls.log\nexit {}", name, code))
  }

  #[cfg(unix)]
  pub fn script(&self, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = self.temp.path().join("bin").join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
  }

  /// Invocations recorded by fake scripts, in order.
  pub fn calls(&self) -> Vec<String> {
    std::fs::read_to_string(self.project.join("calls.log"))
      .unwrap_or_default()
      .lines()
      .map(String::from)
      .collect()
  }

  pub fn output_dir(&self) -> PathBuf {
    self.project.join("build").join("debug-html5")
  }

  /// Get a pre-configured Command for the aurabuild binary.
  ///
  /// Clears the variables the orchestrator reads so the host environment
  /// cannot leak into a test.
  pub fn aurabuild_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("aurabuild");
    cmd.env_remove("KHA_PATH");
    cmd.env_remove("ELECTRON_BIN");
    cmd.env_remove("AURA_OPTICK_PATH");
    cmd.env_remove("RUST_LOG");
    cmd
  }

  /// `aurabuild test --project-dir <project>`.
  pub fn test_cmd(&self) -> Command {
    let mut cmd = self.aurabuild_cmd();
    cmd.arg("test").arg("--project-dir").arg(&self.project);
    cmd
  }
}

pub fn path_str(path: &Path) -> String {
  path.display().to_string()
}
