//! Scenario: Inspecting the Setup
//!
//! Journey: before scheduling, an operator validates the configuration
//! and looks at what each domain lists.

use crate::common::*;

#[test]
fn scenario_check_reports_domains() {
    let env = TestEnv::builder()
        .with_config(TWO_DOMAIN_CONFIG)
        .with_file("corp.json", CORP_SNAPSHOT)
        .with_file("lab.yaml", LAB_SNAPSHOT)
        .build();

    let result = env.run(&["check"]);

    assert!(result.success, "output: {}", result.combined_output());
    assert!(result.stdout.contains("CORP (2 users)"), "{}", result.stdout);
    assert!(result.stdout.contains("LAB (1 users)"), "{}", result.stdout);
}

#[test]
fn scenario_check_fails_on_unreadable_snapshot() {
    let env = TestEnv::builder()
        .with_config(TWO_DOMAIN_CONFIG)
        .with_file("corp.json", CORP_SNAPSHOT)
        .build();

    let result = env.run(&["--json", "check"]);

    assert_eq!(result.exit_code, 1);
    let report = &result.json_lines()[0];
    assert_eq!(report["ok"], false);
    assert!(report["domains"][1]["error"].is_string());
}

#[test]
fn scenario_check_rejects_config_without_domains() {
    let env = TestEnv::builder().with_config("[sync]\ndry_run = true\n").build();

    let result = env.run(&["check"]);

    assert!(!result.success);
    assert!(
        result.stderr.contains("no directory domains configured"),
        "stderr: {}",
        result.stderr
    );
}

#[test]
fn scenario_list_prints_canonical_names() {
    let env = TestEnv::builder()
        .with_config(TWO_DOMAIN_CONFIG)
        .with_file("corp.json", CORP_SNAPSHOT)
        .with_file("lab.yaml", LAB_SNAPSHOT)
        .build();

    let result = env.run(&["list", "CORP"]);
    assert!(result.success, "stderr: {}", result.stderr);
    assert_eq!(result.stdout, "alice\ncarol\n");

    let result = env.run(&["list", "NOPE"]);
    assert!(!result.success);
    assert!(result.stderr.contains("unknown domain 'NOPE'"), "{}", result.stderr);
}

#[test]
fn scenario_missing_config_is_reported() {
    let env = TestEnv::builder().build();

    let result = env.run(&["sync"]);

    assert!(!result.success);
    assert!(
        result.stderr.contains("no configuration file found"),
        "stderr: {}",
        result.stderr
    );
}

#[test]
fn scenario_explicit_config_path() {
    let env = TestEnv::builder()
        .with_file("conf/ldapsync.toml", SINGLE_DOMAIN_CONFIG)
        .with_file("conf/corp.json", CORP_SNAPSHOT)
        .build();

    let config = env.path("conf/ldapsync.toml");
    let result = env.run(&["--config", config.to_str().unwrap(), "sync"]);

    assert!(result.success, "stderr: {}", result.stderr);
    let store = ldapsync::infrastructure::TomlUserStore::new(env.path("conf/users.toml"));
    assert_eq!(
        store.records().unwrap().len(),
        2,
        "store lives next to the config file"
    );
}
