//! Build plans: what the external builder is asked to compile.

pub mod preset;
pub mod resolve;
pub mod types;

pub use preset::{Capabilities, Preset};
pub use resolve::{BuildPlanResolver, TestPlanOptions, resolve_test_plan};
pub use types::{BuildPlan, BuildPlanBuilder, LibraryRef, TreePatch};
