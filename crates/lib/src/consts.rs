/// Path to the Kha builder, required for test runs.
pub const KHA_PATH: &str = "KHA_PATH";
/// Path to the Electron binary that hosts the test runtime.
pub const ELECTRON_BIN: &str = "ELECTRON_BIN";
/// Optional path to an Optick profiler installation.
pub const AURA_OPTICK_PATH: &str = "AURA_OPTICK_PATH";
/// Set on the builder process, points at the serialized build plan.
pub const AURA_BUILD_PLAN: &str = "AURA_BUILD_PLAN";

pub const CONFIG_FILENAME: &str = "aurabuild.toml";
pub const PLAN_FILENAME: &str = "buildplan.json";
