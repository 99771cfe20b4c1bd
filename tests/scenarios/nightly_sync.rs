//! Scenario: Nightly Sync
//!
//! Journey: an operator schedules `ldapsync sync` every night.
//!
//! Steps:
//! 1. First run creates local accounts for every directory user and
//!    disables the accounts that left, sparing excluded ones
//! 2. A second run with no directory change does nothing
//! 3. A returning user is re-enabled
//!
//! Success Criteria:
//! - Counts printed after every run
//! - Excluded and already-disabled accounts are never touched

use crate::common::*;

#[test]
fn scenario_nightly_sync_converges() {
    let env = TestEnv::builder()
        .with_config(SINGLE_DOMAIN_CONFIG)
        .with_file("corp.json", CORP_SNAPSHOT)
        .with_store(EXISTING_STORE)
        .build();

    // Step 1: first run
    let result = env.run(&["sync"]);
    assert!(
        result.success,
        "Step 1: sync should succeed.\nstdout: {}\nstderr: {}",
        result.stdout, result.stderr
    );
    assert!(result.stdout.contains("Added: 2 (failed: 0)"), "{}", result.stdout);
    assert!(result.stdout.contains("Disabled: 1 (failed: 0)"), "{}", result.stdout);
    assert!(result.stdout.contains("Excluded: 2"), "{}", result.stdout);

    let alice = env.store_record("alice");
    assert!(alice.block.is_none());
    assert_eq!(alice.domain.as_deref(), Some("CORP"));
    assert_eq!(alice.real_name.as_deref(), Some("Alice Example"));
    assert_eq!(alice.email.as_deref(), Some("alice@corp.example"));

    let bob = env.store_record("bob");
    let block = bob.block.expect("bob should be disabled");
    assert_eq!(block.reason, "User is not in the directory");
    assert_eq!(block.tags, vec!["ldap".to_string()]);
    assert_eq!(block.actor, "Maintenance script");

    assert!(env.store_record("admin").block.is_none());
    assert!(env.store_record("robot").block.is_none());
    assert!(env.store_record("dave").block.is_some());

    // Step 2: nothing changed in the directory
    let before = env.store_contents();
    let result = env.run(&["sync"]);
    assert!(result.success, "Step 2 stderr: {}", result.stderr);
    assert!(result.stdout.contains("Added: 0 (failed: 0)"), "{}", result.stdout);
    assert!(result.stdout.contains("Disabled: 0 (failed: 0)"), "{}", result.stdout);
    assert_eq!(env.store_records().len(), 6);
    assert_eq!(before, env.store_contents(), "Step 2: store should not change");

    // Step 3: bob is back
    env.write_file(
        "corp.json",
        r#"[
  {"sAMAccountName": "Alice", "cn": "Alice Example", "mail": "alice@corp.example"},
  {"sAMAccountName": "carol", "cn": "Carol Example"},
  {"sAMAccountName": "BOB", "cn": "Bob Returns"}
]"#,
    );
    let result = env.run(&["sync", "-v"]);
    assert!(result.success, "Step 3 stderr: {}", result.stderr);
    assert!(result.stdout.contains("Enabled: 1"), "{}", result.stdout);
    assert!(result.stdout.contains("bob [CORP]"), "{}", result.stdout);

    let bob = env.store_record("bob");
    assert!(bob.block.is_none());
    assert_eq!(bob.real_name.as_deref(), Some("Bob Returns"));
    assert_eq!(env.store_records().len(), 6, "Step 3: no duplicate account for bob");
}

#[test]
fn scenario_disable_only_never_creates() {
    let env = TestEnv::builder()
        .with_config(SINGLE_DOMAIN_CONFIG)
        .with_file("corp.json", CORP_SNAPSHOT)
        .with_store(EXISTING_STORE)
        .build();

    let result = env.run(&["sync", "--disable-only"]);

    assert!(result.success, "stderr: {}", result.stderr);
    assert!(result.stdout.contains("Added: 0 (failed: 0)"), "{}", result.stdout);
    assert!(result.stdout.contains("Disabled: 1 (failed: 0)"), "{}", result.stdout);
    assert_eq!(env.store_records().len(), 4);
    assert!(env.store_record("bob").block.is_some());
}

#[test]
fn scenario_second_run_rejected_while_locked() {
    let env = TestEnv::builder()
        .with_config(SINGLE_DOMAIN_CONFIG)
        .with_file("corp.json", CORP_SNAPSHOT)
        .build();

    let _held = ldapsync::infrastructure::RunLock::acquire(&env.path("users.toml")).unwrap();
    let result = env.run(&["sync"]);

    assert!(!result.success);
    assert!(
        result.stderr.contains("another reconciliation run is in progress"),
        "stderr: {}",
        result.stderr
    );
    assert!(env.store_contents().is_empty());
}
