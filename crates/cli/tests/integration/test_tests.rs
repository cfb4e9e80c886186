//! `aurabuild test` end-to-end tests with fake builder and runtime.

use predicates::prelude::*;

use super::common::{TestEnv, path_str};

#[test]
fn successful_run_exits_zero_and_stages_assets() {
  let env = TestEnv::new();
  let builder = env.fake("fakebuilder", 0);
  let runtime = env.fake("fakeruntime", 0);

  env
    .test_cmd()
    .env("KHA_PATH", &builder)
    .env("ELECTRON_BIN", &runtime)
    .assert()
    .success()
    .stdout(predicate::str::contains("Tests passed"));

  assert_eq!(
    env.calls(),
    vec![
      "fakebuilder make debug-html5 --debug".to_string(),
      "fakeruntime --no-sandbox --force-device-scale-factor=1 --force_low_power_gpu build/debug-html5/electron.js"
        .to_string(),
    ]
  );
  let out = env.output_dir();
  assert_eq!(std::fs::read_to_string(out.join("index.html")).unwrap(), "<html></html>");
  let bridge = std::fs::read_to_string(out.join("electron.js")).unwrap();
  assert!(bridge.contains("electron.ipcMain.on('log-main'"));
  for severity in ["log", "info", "warn", "error"] {
    assert!(bridge.contains(&format!("case \"{}\":", severity)));
  }
  assert!(out.join("buildplan.json").exists());
}

#[test]
fn missing_kha_path_exits_one_before_spawning() {
  let env = TestEnv::new();
  let runtime = env.fake("fakeruntime", 0);

  env
    .test_cmd()
    .env("ELECTRON_BIN", &runtime)
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("Environment variable 'KHA_PATH' not set!"));

  assert!(env.calls().is_empty());
}

#[test]
fn missing_env_var_skips_dependency_install() {
  let env = TestEnv::without_deps();
  env.write_file(
    "aurabuild.toml",
    &format!("[deps]\ninstaller = \"{}\"\n", path_str(&env.fake("fakehaxelib", 0))),
  );

  env.test_cmd().assert().failure().code(1);

  assert!(env.calls().is_empty());
}

#[test]
fn builder_exit_code_is_propagated_and_runtime_never_runs() {
  let env = TestEnv::new();
  let builder = env.fake("fakebuilder", 2);
  let runtime = env.fake("fakeruntime", 0);

  env
    .test_cmd()
    .env("KHA_PATH", &builder)
    .env("ELECTRON_BIN", &runtime)
    .assert()
    .failure()
    .code(2);

  assert_eq!(env.calls(), vec!["fakebuilder make debug-html5 --debug".to_string()]);
}

#[test]
fn runtime_exit_code_is_propagated() {
  let env = TestEnv::new();
  let builder = env.fake("fakebuilder", 0);
  let runtime = env.fake("fakeruntime", 3);

  env
    .test_cmd()
    .env("KHA_PATH", &builder)
    .env("ELECTRON_BIN", &runtime)
    .assert()
    .failure()
    .code(3);
}

#[test]
fn child_output_is_forwarded() {
  let env = TestEnv::new();
  let builder = env.script("fakebuilder", "echo compiling aura\necho 'warning: unused' >&2");
  let runtime = env.script("fakeruntime", "echo 'all tests passed'");

  env
    .test_cmd()
    .env("KHA_PATH", &builder)
    .env("ELECTRON_BIN", &runtime)
    .assert()
    .success()
    .stdout(predicate::str::contains("compiling aura"))
    .stdout(predicate::str::contains("all tests passed"))
    .stderr(predicate::str::contains("warning: unused"));
}

#[test]
fn switches_are_forwarded_to_builder() {
  let env = TestEnv::new();
  let builder = env.fake("fakebuilder", 0);
  let runtime = env.fake("fakeruntime", 0);

  env
    .test_cmd()
    .arg("--")
    .arg("-aura-no-backend")
    .env("KHA_PATH", &builder)
    .env("ELECTRON_BIN", &runtime)
    .assert()
    .success();

  assert_eq!(env.calls()[0], "fakebuilder make debug-html5 --debug -aura-no-backend");
  let plan = std::fs::read_to_string(env.output_dir().join("buildplan.json")).unwrap();
  assert!(plan.contains("AURA_NO_BACKEND"));
}

#[test]
fn missing_harness_is_fatal() {
  let env = TestEnv::new();
  std::fs::remove_file(env.project.join("Data").join("index.html")).unwrap();
  let builder = env.fake("fakebuilder", 0);
  let runtime = env.fake("fakeruntime", 0);

  env
    .test_cmd()
    .env("KHA_PATH", &builder)
    .env("ELECTRON_BIN", &runtime)
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("failed to copy"));

  assert!(env.calls().iter().all(|c| !c.starts_with("fakeruntime")));
}

#[test]
fn missing_optick_path_only_warns() {
  let env = TestEnv::new();
  let builder = env.fake("fakebuilder", 0);
  let runtime = env.fake("fakeruntime", 0);

  env
    .test_cmd()
    .env("KHA_PATH", &builder)
    .env("ELECTRON_BIN", &runtime)
    .env("AURA_OPTICK_PATH", env.temp.path().join("no-optick-here"))
    .assert()
    .success()
    .stderr(predicate::str::contains("does not exist"));
}
