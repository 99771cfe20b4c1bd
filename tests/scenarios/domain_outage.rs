//! Scenario: Domain Outage
//!
//! Journey: one of two directory domains cannot be read.
//!
//! Success Criteria:
//! - By default the run aborts and the store is left untouched
//! - With `--continue-on-domain-error` the healthy domain is synced and
//!   accounts that may belong to the failed domain are left alone

use crate::common::*;

fn outage_env() -> TestEnv {
    // lab.yaml is missing
    TestEnv::builder()
        .with_config(TWO_DOMAIN_CONFIG)
        .with_file("corp.json", CORP_SNAPSHOT)
        .with_store(EXISTING_STORE)
        .build()
}

#[test]
fn scenario_outage_aborts_by_default() {
    let env = outage_env();
    let before = env.store_contents();

    let result = env.run(&["sync"]);

    assert_eq!(result.exit_code, 1, "output: {}", result.combined_output());
    assert!(result.stdout.contains("Sync Failed"), "{}", result.stdout);
    assert!(result.stdout.contains("LAB"), "{}", result.stdout);
    assert_eq!(before, env.store_contents(), "store must not change");
}

#[test]
fn scenario_outage_skips_failed_domain_when_asked() {
    let env = outage_env();

    let result = env.run(&["sync", "--continue-on-domain-error"]);

    assert!(result.success, "output: {}", result.combined_output());
    assert!(result.stdout.contains("Skipped domains: LAB"), "{}", result.stdout);
    assert!(result.stdout.contains("Added: 2 (failed: 0)"), "{}", result.stdout);

    // bob is recorded in CORP, which was listed
    assert!(env.store_record("bob").block.is_some());
    // no recorded domain: may belong to LAB
    assert!(env.store_record("admin").block.is_none());
    assert!(env.store_record("robot").block.is_none());
}

#[test]
fn scenario_outage_recovers_when_snapshot_returns() {
    let env = outage_env();
    assert_eq!(env.run(&["sync"]).exit_code, 1);

    env.write_file("lab.yaml", LAB_SNAPSHOT);
    let result = env.run(&["sync"]);

    assert!(result.success, "output: {}", result.combined_output());
    // dave is listed in LAB again
    assert!(result.stdout.contains("Enabled: 1"), "{}", result.stdout);
    let dave = env.store_record("dave");
    assert!(dave.block.is_none());
    assert_eq!(dave.domain.as_deref(), Some("LAB"));
}
