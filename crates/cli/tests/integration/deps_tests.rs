//! Dependency installation through the CLI.

use predicates::prelude::*;

use super::common::{TestEnv, path_str};

fn with_fake_installer(env: &TestEnv, code: i32) {
  let installer = env.script(
    "fakehaxelib",
    &format!(
      "echo \"haxelib $@\" >> calls.log\n[ \"$1\" = newrepo ] && mkdir -p .haxelib\nexit {}",
      code
    ),
  );
  env.write_file(
    "aurabuild.toml",
    &format!("[deps]\ninstaller = \"{}\"\n", path_str(&installer)),
  );
}

#[test]
fn install_deps_runs_installer_once() {
  let env = TestEnv::without_deps();
  with_fake_installer(&env, 0);

  env
    .aurabuild_cmd()
    .args(["install-deps", "--project-dir"])
    .arg(&env.project)
    .assert()
    .success()
    .stdout(predicate::str::contains("Installed dependencies"));

  env
    .aurabuild_cmd()
    .args(["install-deps", "--project-dir"])
    .arg(&env.project)
    .assert()
    .success()
    .stdout(predicate::str::contains("already installed"));

  assert_eq!(
    env.calls(),
    vec!["haxelib newrepo".to_string(), "haxelib install TestDeps.hxml --always".to_string()]
  );
}

#[test]
fn failed_install_aborts_with_installer_code() {
  let env = TestEnv::without_deps();
  with_fake_installer(&env, 6);

  env
    .aurabuild_cmd()
    .args(["install-deps", "--project-dir"])
    .arg(&env.project)
    .assert()
    .failure()
    .code(6);
}

#[test]
fn test_run_installs_before_building() {
  let env = TestEnv::without_deps();
  with_fake_installer(&env, 0);
  let builder = env.fake("fakebuilder", 0);
  let runtime = env.fake("fakeruntime", 0);

  env
    .test_cmd()
    .env("KHA_PATH", &builder)
    .env("ELECTRON_BIN", &runtime)
    .assert()
    .success();

  let calls = env.calls();
  assert_eq!(calls.len(), 4);
  assert_eq!(calls[0], "haxelib newrepo");
  assert!(calls[2].starts_with("fakebuilder"));
  assert!(calls[3].starts_with("fakeruntime"));
}

#[test]
fn failed_install_stops_test_run() {
  let env = TestEnv::without_deps();
  with_fake_installer(&env, 9);
  let builder = env.fake("fakebuilder", 0);
  let runtime = env.fake("fakeruntime", 0);

  env
    .test_cmd()
    .env("KHA_PATH", &builder)
    .env("ELECTRON_BIN", &runtime)
    .assert()
    .failure()
    .code(9);

  assert_eq!(env.calls(), vec!["haxelib newrepo".to_string()]);
}
