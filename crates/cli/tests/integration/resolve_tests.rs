//! `aurabuild resolve` integration tests.

use predicates::prelude::*;

use super::common::{TestEnv, path_str};

fn resolve_json(env: &TestEnv, args: &[&str]) -> serde_json::Value {
  let output = env
    .aurabuild_cmd()
    .args(["resolve", "--format", "json"])
    .args(args)
    .output()
    .unwrap();
  assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
  serde_json::from_slice(&output.stdout).unwrap()
}

fn defines(plan: &serde_json::Value) -> Vec<String> {
  plan["defines"]
    .as_array()
    .unwrap()
    .iter()
    .map(|d| d.as_str().unwrap().to_string())
    .collect()
}

#[test]
fn hl_target_selects_backend() {
  let env = TestEnv::new();
  let plan = resolve_json(&env, &["linux-hl"]);

  assert_eq!(plan["platform"], "linux-hl");
  assert_eq!(plan["libraries"][0]["name"], "hl");
  assert_eq!(defines(&plan), vec!["AURA_BACKEND_HL"]);
}

#[test]
fn no_backend_switch_wins() {
  let env = TestEnv::new();
  let plan = resolve_json(&env, &["windows-hl", "-aura-no-backend"]);

  assert!(plan["libraries"].as_array().unwrap().is_empty());
  assert_eq!(defines(&plan), vec!["AURA_NO_BACKEND"]);
}

#[test]
fn native_target_gets_simd_unless_disabled() {
  let env = TestEnv::new();
  assert_eq!(defines(&resolve_json(&env, &["linux"])), vec!["AURA_USE_SIMD"]);
  assert!(defines(&resolve_json(&env, &["linux", "--aura-no-simd"])).is_empty());
  assert!(defines(&resolve_json(&env, &["--preset", "legacy", "linux"])).is_empty());
}

#[test]
fn platform_token_can_follow_other_arguments() {
  let env = TestEnv::new();
  let plan = resolve_json(&env, &["make", "--debug", "osx-hl"]);
  assert_eq!(plan["platform"], "osx-hl");
}

#[test]
fn unknown_platform_resolves_to_plain_plan() {
  let env = TestEnv::new();
  let plan = resolve_json(&env, &["future-console"]);

  assert_eq!(plan["platform"], "future-console");
  assert!(defines(&plan).is_empty());
  assert!(plan["libraries"].as_array().unwrap().is_empty());
}

#[test]
fn optick_installation_is_merged() {
  let env = TestEnv::new();
  let optick = env.temp.path().join("optick");
  std::fs::create_dir_all(&optick).unwrap();

  let output = env
    .aurabuild_cmd()
    .env("AURA_OPTICK_PATH", &optick)
    .args(["resolve", "--format", "json", "linux-hl"])
    .output()
    .unwrap();
  let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

  assert!(defines(&plan).contains(&"AURA_WITH_OPTICK".to_string()));
  assert_eq!(plan["libraries"][1]["name"], "optick");
  assert_eq!(plan["libraries"][1]["path"], path_str(&optick));
  assert!(plan["macro_parameters"][0].as_str().unwrap().contains("optick.h"));
}

#[test]
fn text_output_lists_sections() {
  let env = TestEnv::new();
  env
    .aurabuild_cmd()
    .args(["resolve", "linux-hl"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Platform: linux-hl (vm-backend)"))
    .stdout(predicate::str::contains("Libraries"))
    .stdout(predicate::str::contains("AURA_BACKEND_HL"));
}

#[test]
fn backend_selection_is_logged() {
  let env = TestEnv::new();
  env
    .aurabuild_cmd()
    .args(["resolve", "android-hl"])
    .assert()
    .success()
    .stderr(predicate::str::contains("[Aura] Added HL/C backend"));
}

#[test]
fn test_plan_includes_harness() {
  let env = TestEnv::new();
  let plan = resolve_json(&env, &["--test"]);

  assert_eq!(plan["platform"], "debug-html5");
  let defines = defines(&plan);
  assert!(defines.contains(&"AURA_UNIT_TESTS".to_string()));
  assert!(defines.contains(&"UTEST_PRINT_TESTS".to_string()));
  assert!(plan["target_options"]["html5.expose"]
    .as_str()
    .unwrap()
    .contains("logToMainProcess"));
}
