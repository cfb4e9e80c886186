mod install_deps;
mod platforms;
mod resolve;

pub use install_deps::cmd_install_deps;
pub use platforms::cmd_platforms;
pub use resolve::cmd_resolve;
pub use test::{TestArgs, cmd_test};
