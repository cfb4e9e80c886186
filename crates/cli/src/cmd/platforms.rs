use aurabuild_lib::platform::PlatformId;

use crate::output::{OutputFormat, print_json};

#[derive(serde::Serialize)]
struct PlatformEntry {
  token: String,
  family: &'static str,
}

pub fn cmd_platforms(format: OutputFormat) -> anyhow::Result<()> {
  let entries: Vec<PlatformEntry> = PlatformId::known()
    .into_iter()
    .map(|p| PlatformEntry {
      token: p.token(),
      family: p.family().as_str(),
    })
    .collect();

  if format.is_json() {
    return print_json(&entries);
  }

  for entry in entries {
    println!("{:<12} {}", entry.token, entry.family);
  }
  Ok(())
}
