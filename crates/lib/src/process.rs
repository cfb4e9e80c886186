//! Child process execution.
//!
//! Spawns one external command per call, forwards its stdout and stderr line by
//! line while it runs, and turns the exit status into a result. Terminating the
//! current process is never done here: a failure carries its `exit_on_error`
//! policy up to the caller, and only the top level decides to exit.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, error, info};

#[derive(Debug, Error)]
pub enum ProcessError {
  #[error("failed to spawn {command}: {source}")]
  Spawn {
    command: String,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to read output of {command}: {source}")]
  Io {
    command: String,
    #[source]
    source: std::io::Error,
  },

  #[error(
    "{command} failed with exit code {}",
    .code.map_or_else(|| "<signal>".to_string(), |c| c.to_string())
  )]
  NonZeroExit {
    command: String,
    code: Option<i32>,
    exit_on_error: bool,
  },
}

impl ProcessError {
  /// Exit code to terminate the run with if this error reaches the top level.
  pub fn exit_code(&self) -> i32 {
    match self {
      ProcessError::NonZeroExit { code: Some(code), .. } if *code != 0 => *code,
      _ => 1,
    }
  }

  /// True when the caller opted out of terminating on failure.
  ///
  /// The test workflow runs every child with `exit_on_error`; only callers
  /// that inspect the failure themselves pass `false`.
  pub fn is_recoverable(&self) -> bool {
    matches!(self, ProcessError::NonZeroExit { exit_on_error: false, .. })
  }
}

/// Outcome of a child process that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildProcessResult {
  pub exit_code: Option<i32>,
}

/// Receives child output as it arrives, one line at a time.
pub trait LineSink: Sync {
  fn stdout_line(&self, line: &str);
  fn stderr_line(&self, line: &str);
}

/// Forwards child stdout to our stdout and child stderr to our stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl LineSink for ConsoleSink {
  fn stdout_line(&self, line: &str) {
    println!("{}", line);
  }

  fn stderr_line(&self, line: &str) {
    eprintln!("{}", line);
  }
}

/// A command line to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
  pub program: PathBuf,
  pub args: Vec<String>,
  pub cwd: Option<PathBuf>,
  pub env: BTreeMap<String, String>,
}

impl CommandSpec {
  pub fn new(program: impl Into<PathBuf>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: None,
      env: BTreeMap::new(),
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn with_cwd(mut self, cwd: &Path) -> Self {
    self.cwd = Some(cwd.to_path_buf());
    self
  }

  pub fn with_env(mut self, key: &str, value: impl Into<String>) -> Self {
    self.env.insert(key.to_string(), value.into());
    self
  }
}

impl fmt::Display for CommandSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program.display())?;
    for arg in &self.args {
      write!(f, " {}", arg)?;
    }
    Ok(())
  }
}

/// Run the command to completion.
///
/// stdout and stderr are drained concurrently and both are fully consumed
/// before the exit status is inspected. The child gets no stdin, and it is
/// killed if this future is dropped or reading its output fails.
///
/// On a non-zero exit the returned [`ProcessError::NonZeroExit`] records
/// `exit_on_error`, so the top level knows whether to terminate the run with
/// the child's code or let the caller recover.
pub async fn run_command(
  spec: &CommandSpec,
  exit_on_error: bool,
  sink: &dyn LineSink,
) -> Result<ChildProcessResult, ProcessError> {
  let command_str = spec.to_string();
  info!(command = %command_str, "spawning child process");

  let mut command = Command::new(&spec.program);
  command
    .args(&spec.args)
    .stdin(Stdio::null())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .kill_on_drop(true);
  if let Some(cwd) = &spec.cwd {
    command.current_dir(cwd);
  }
  for (key, value) in &spec.env {
    command.env(key, value);
  }

  let mut child = command.spawn().map_err(|source| ProcessError::Spawn {
    command: command_str.clone(),
    source,
  })?;

  let stdout = child.stdout.take();
  let stderr = child.stderr.take();

  let (out, err) = tokio::join!(
    forward_lines(stdout, |line| sink.stdout_line(line)),
    forward_lines(stderr, |line| sink.stderr_line(line)),
  );
  let io_err = |source| ProcessError::Io {
    command: command_str.clone(),
    source,
  };
  out.map_err(io_err)?;
  err.map_err(io_err)?;

  let status = child.wait().await.map_err(io_err)?;
  let code = status.code();

  if status.success() {
    info!(command = %command_str, code = 0, "child process exited with code 0");
    return Ok(ChildProcessResult { exit_code: code });
  }

  error!(command = %command_str, code = ?code, "child process failed");
  Err(ProcessError::NonZeroExit {
    command: command_str,
    code,
    exit_on_error,
  })
}

async fn forward_lines<R, F>(reader: Option<R>, mut emit: F) -> std::io::Result<()>
where
  R: AsyncRead + Unpin,
  F: FnMut(&str),
{
  let Some(reader) = reader else {
    return Ok(());
  };
  let mut reader = BufReader::new(reader);
  let mut buf = Vec::new();
  loop {
    buf.clear();
    if reader.read_until(b'\n', &mut buf).await? == 0 {
      break;
    }
    let line = String::from_utf8_lossy(&buf);
    let line = line.trim_end_matches(['\n', '\r']);
    debug!(line = %line, "child output");
    emit(line);
  }
  Ok(())
}
