//! Test utilities for aurabuild-lib.

use std::sync::Mutex;

use crate::process::LineSink;

/// Returns the shell command and args to execute a shell script.
#[cfg(unix)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

#[cfg(windows)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), script.to_string()])
}

/// Write an executable shell script at `path`.
#[cfg(unix)]
pub fn write_script(path: &std::path::Path, body: &str) {
  use std::os::unix::fs::PermissionsExt;

  std::fs::write(path, format!("#!/bin/sh\n{}\n", body)).unwrap();
  let mut perms = std::fs::metadata(path).unwrap().permissions();
  perms.set_mode(0o755);
  std::fs::set_permissions(path, perms).unwrap();
}

/// Collects child output in memory.
#[derive(Debug, Default)]
pub struct CaptureSink {
  stdout: Mutex<Vec<String>>,
  stderr: Mutex<Vec<String>>,
}

impl CaptureSink {
  pub fn stdout(&self) -> Vec<String> {
    self.stdout.lock().unwrap().clone()
  }

  pub fn stderr(&self) -> Vec<String> {
    self.stderr.lock().unwrap().clone()
  }
}

impl LineSink for CaptureSink {
  fn stdout_line(&self, line: &str) {
    self.stdout.lock().unwrap().push(line.to_string());
  }

  fn stderr_line(&self, line: &str) {
    self.stderr.lock().unwrap().push(line.to_string());
  }
}
