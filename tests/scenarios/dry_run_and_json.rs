//! Scenario: Dry Run and Machine Output
//!
//! Journey: an operator previews a run, then wires ldapsync into a
//! scheduler that reads NDJSON.

use crate::common::*;

#[test]
fn scenario_dry_run_previews_without_writing() {
    let env = TestEnv::builder()
        .with_config(SINGLE_DOMAIN_CONFIG)
        .with_file("corp.json", CORP_SNAPSHOT)
        .with_store(EXISTING_STORE)
        .build();
    let before = env.store_contents();

    let result = env.run(&["sync", "--dry-run"]);

    assert!(result.success, "stderr: {}", result.stderr);
    assert!(result.stdout.contains("Dry Run Complete"), "{}", result.stdout);
    assert!(result.stdout.contains("- bob"), "{}", result.stdout);
    assert!(result.stdout.contains("+ alice [CORP]"), "{}", result.stdout);
    assert!(!result.stdout.contains("- admin"), "{}", result.stdout);
    assert_eq!(before, env.store_contents(), "dry run must not write");
}

#[test]
fn scenario_dry_run_from_environment() {
    let env = TestEnv::builder()
        .with_config(SINGLE_DOMAIN_CONFIG)
        .with_file("corp.json", CORP_SNAPSHOT)
        .build();

    let result = env.run_with_env(&["sync"], &[("LDAPSYNC_DRY_RUN", "true")]);

    assert!(result.success, "stderr: {}", result.stderr);
    assert!(result.stdout.contains("Dry Run Complete"), "{}", result.stdout);
    assert!(env.store_contents().is_empty());
}

#[test]
fn scenario_json_stream() {
    let env = TestEnv::builder()
        .with_config(SINGLE_DOMAIN_CONFIG)
        .with_file("corp.json", CORP_SNAPSHOT)
        .with_store(EXISTING_STORE)
        .build();

    let result = env.run(&["--json", "sync"]);
    assert!(result.success, "stderr: {}", result.stderr);

    let lines = result.json_lines();
    assert_eq!(lines[0]["event"], "start");
    assert_eq!(lines[0]["domains"][0], "CORP");

    let events: Vec<&str> = lines.iter().filter_map(|l| l["event"].as_str()).collect();
    assert!(events.contains(&"domain_listed"));
    assert!(events.contains(&"user_added"));
    assert!(events.contains(&"user_disabled"));
    assert!(events.contains(&"user_excluded"));

    let complete = lines
        .iter()
        .find(|l| l["event"] == "complete")
        .expect("complete event");
    assert_eq!(complete["status"], "success");
    assert_eq!(complete["added"], 2);
    assert_eq!(complete["disabled"], 1);

    let summary = lines.last().unwrap();
    assert_eq!(summary["ok"], true);
    assert_eq!(summary["added_count"], 2);
    assert_eq!(summary["excluded_count"], 2);
}

#[test]
fn scenario_user_page_is_published_for_new_accounts() {
    let config = format!(
        "{}\n[pages]\ndir = \"wiki\"\ncontent = \"Welcome to the wiki\"\n",
        SINGLE_DOMAIN_CONFIG
    );
    let env = TestEnv::builder()
        .with_config(&config)
        .with_file("corp.json", CORP_SNAPSHOT)
        .build();

    let result = env.run(&["sync"]);

    assert!(result.success, "stderr: {}", result.stderr);
    let page = std::fs::read_to_string(env.path("wiki/alice.md")).unwrap();
    assert_eq!(page, "Welcome to the wiki");
    assert!(env.path("wiki/carol.md").exists());
}
