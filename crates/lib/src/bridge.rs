//! Renderer-to-main-process logging bridge.
//!
//! Tests run inside an Electron renderer, whose console is not visible on the
//! command line. The test build exposes `logToMainProcess` to the renderer,
//! and a handler appended to the generated `electron.js` forwards each
//! message to the main process console at its severity.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// IPC channel shared by both halves of the bridge.
pub const CHANNEL: &str = "log-main";

/// Target option that receives [`expose_entry`].
pub const EXPOSE_OPTION: &str = "html5.expose";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown log severity '{0}'")]
pub struct UnknownSeverity(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BridgeSeverity {
  Log,
  Info,
  Warn,
  Error,
}

impl BridgeSeverity {
  pub const ALL: [BridgeSeverity; 4] = [
    BridgeSeverity::Log,
    BridgeSeverity::Info,
    BridgeSeverity::Warn,
    BridgeSeverity::Error,
  ];

  /// The severity token, which is also the host `console` method it maps to.
  pub fn as_str(self) -> &'static str {
    match self {
      BridgeSeverity::Log => "log",
      BridgeSeverity::Info => "info",
      BridgeSeverity::Warn => "warn",
      BridgeSeverity::Error => "error",
    }
  }
}

impl fmt::Display for BridgeSeverity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for BridgeSeverity {
  type Err = UnknownSeverity;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    BridgeSeverity::ALL
      .into_iter()
      .find(|sev| sev.as_str() == s)
      .ok_or_else(|| UnknownSeverity(s.to_string()))
  }
}

/// Entry added to the renderer's exposed API.
pub fn expose_entry() -> String {
  format!(
    "logToMainProcess: (type, text) => electron.ipcRenderer.send('{}', type, text),",
    CHANNEL
  )
}

/// Main process handler appended to the generated `electron.js`.
///
/// Any severity outside [`BridgeSeverity::ALL`] throws.
pub fn main_process_snippet() -> String {
  let mut out = format!("electron.ipcMain.on('{}', (event, type, text) => {{\n", CHANNEL);
  out.push_str("\tswitch (type) {\n");
  for severity in BridgeSeverity::ALL {
    out.push_str(&format!(
      "\t\tcase \"{sev}\":\n\t\t\tconsole.{sev}(text);\n\t\t\tbreak;\n",
      sev = severity
    ));
  }
  out.push_str("\t\tdefault:\n\t\t\tthrow \"Unreachable\";\n");
  out.push_str("\t}\n});\n");
  out
}
