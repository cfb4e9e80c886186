mod cmd;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use aurabuild_lib::AuraError;
use aurabuild_lib::plan::Preset;

use cmd::{TestArgs, cmd_install_deps, cmd_platforms, cmd_resolve, cmd_test};
use output::{OutputFormat, print_error};

/// aurabuild - build configuration and test runner for Aura
#[derive(Parser)]
#[command(name = "aurabuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Resolve and print the build plan for a platform
  Resolve {
    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    format: OutputFormat,

    /// Capability preset
    #[arg(long, default_value = "current")]
    preset: Preset,

    /// Resolve the unit test plan (debug-html5) instead
    #[arg(long)]
    test: bool,

    /// Builder arguments: a platform token and switches such as -aura-no-backend
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
  },

  /// Build and run the unit tests
  Test(TestArgs),

  /// Install haxelib dependencies if they are missing
  InstallDeps {
    /// Test project directory
    #[arg(short, long, default_value = ".")]
    project_dir: PathBuf,
  },

  /// List known platform tokens
  Platforms {
    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    format: OutputFormat,
  },
}

fn main() {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = match cli.command {
    Commands::Resolve {
      format,
      preset,
      test,
      args,
    } => cmd_resolve(&args, preset, test, format),
    Commands::Test(args) => cmd_test(args),
    Commands::InstallDeps { project_dir } => cmd_install_deps(&project_dir),
    Commands::Platforms { format } => cmd_platforms(format),
  };

  if let Err(err) = result {
    print_error(&err.to_string());
    std::process::exit(exit_code(&err));
  }
}

/// A failed child process determines the exit code; every other error is 1.
fn exit_code(err: &anyhow::Error) -> i32 {
  err.downcast_ref::<AuraError>().map_or(1, AuraError::exit_code)
}
