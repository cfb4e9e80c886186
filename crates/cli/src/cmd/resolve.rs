//! Implementation of the `aurabuild resolve` command.
//!
//! Resolves a build plan from builder-style arguments and prints it without
//! running anything.

use anyhow::{Result, bail};

use aurabuild_lib::env::EnvSnapshot;
use aurabuild_lib::flags::CliFlags;
use aurabuild_lib::plan::{BuildPlan, BuildPlanResolver, Preset, TestPlanOptions, resolve_test_plan};
use aurabuild_lib::platform::PlatformId;

use crate::output::{OutputFormat, print_json, print_section, print_stat};

/// The platform is the first known platform token in `args`. If there is
/// none, the first argument that is not a switch is taken as-is and resolves
/// like an unknown platform.
fn select_platform(args: &[String]) -> Option<PlatformId> {
  PlatformId::from_args(args).or_else(|| {
    args
      .iter()
      .find(|a| !a.starts_with('-'))
      .map(|a| PlatformId::from_token(a))
  })
}

pub fn cmd_resolve(args: &[String], preset: Preset, test: bool, format: OutputFormat) -> Result<()> {
  let flags = CliFlags::from_args(args.iter().cloned());
  let env = EnvSnapshot::capture();

  let plan = if test {
    resolve_test_plan(preset.capabilities(), &flags, &env, &TestPlanOptions::default())
  } else {
    let Some(platform) = select_platform(args) else {
      bail!("no target platform given (try `aurabuild platforms`)");
    };
    BuildPlanResolver::new(preset.capabilities()).resolve(&platform, &flags, &env)
  };

  if format.is_json() {
    return print_json(&plan);
  }
  print_plan(&plan);
  Ok(())
}

fn print_plan(plan: &BuildPlan) {
  println!("Platform: {} ({})", plan.platform(), plan.platform().family());

  print_section("Source roots");
  for root in plan.source_roots() {
    println!("  {}", root.display());
  }

  print_section("Libraries");
  for library in plan.libraries() {
    match &library.path {
      Some(path) => println!("  {} ({})", library.name, path.display()),
      None => println!("  {}", library.name),
    }
  }

  print_section("Defines");
  for define in plan.defines() {
    println!("  {}", define);
  }

  if !plan.c_defines().is_empty() {
    print_section("C defines");
    for define in plan.c_defines() {
      println!("  {}", define);
    }
  }

  if !plan.macro_parameters().is_empty() {
    print_section("Parameters");
    for parameter in plan.macro_parameters() {
      println!("  {}", parameter);
    }
  }

  if !plan.target_options().is_empty() {
    print_section("Target options");
    for (key, value) in plan.target_options() {
      print_stat(key, value);
    }
  }

  if !plan.patches().is_empty() {
    print_section("Patches");
    for patch in plan.patches() {
      println!("  {}", patch.library.join(&patch.file).display());
    }
  }
}
