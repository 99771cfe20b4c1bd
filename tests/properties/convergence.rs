//! Property tests for end-to-end reconciliation against the snapshot
//! directory and the TOML store.

use std::collections::BTreeSet;
use std::sync::Arc;

use proptest::prelude::*;
use tempfile::TempDir;

use ldapsync::application::{ReconcileOptions, ReconcileUseCase, RunContext};
use ldapsync::domain::entities::{DomainConfig, UserAttributes};
use ldapsync::domain::policies::ExclusionRules;
use ldapsync::domain::ports::{BlockDetails, UserStore};
use ldapsync::domain::value_objects::Username;
use ldapsync::infrastructure::{SnapshotDirectory, TomlUserStore};

const POOL: &[&str] = &["Alice", "Bob", "Carol", "Dave", "Erin", "Frank"];

#[derive(Debug, Clone)]
struct Population {
    listed: Vec<bool>,
    /// `None` = no local account, `Some(disabled)` otherwise
    local: Vec<Option<bool>>,
    excluded: Vec<bool>,
}

fn population() -> impl Strategy<Value = Population> {
    (
        proptest::collection::vec(any::<bool>(), POOL.len()),
        proptest::collection::vec(proptest::option::of(any::<bool>()), POOL.len()),
        proptest::collection::vec(proptest::bool::weighted(0.2), POOL.len()),
    )
        .prop_map(|(listed, local, excluded)| Population {
            listed,
            local,
            excluded,
        })
}

fn name(raw: &str) -> Username {
    Username::canonicalize(raw).unwrap()
}

struct Fixture {
    _dir: TempDir,
    domain: DomainConfig,
    store: TomlUserStore,
    rules: ExclusionRules,
}

fn fixture(pop: &Population) -> Fixture {
    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("corp.json");
    let entries: Vec<serde_json::Value> = POOL
        .iter()
        .zip(&pop.listed)
        .filter(|(_, listed)| **listed)
        .map(|(user, _)| serde_json::json!({ "sAMAccountName": user }))
        .collect();
    std::fs::write(&snapshot, serde_json::to_string(&entries).unwrap()).unwrap();

    let store = TomlUserStore::new(dir.path().join("users.toml"));
    let block = BlockDetails {
        reason: "seed".to_string(),
        tags: Vec::new(),
        actor: "test".to_string(),
    };
    for (user, state) in POOL.iter().zip(&pop.local) {
        if let Some(disabled) = state {
            let identity = store
                .create_user(&name(user), &UserAttributes::default())
                .unwrap();
            if *disabled {
                store.disable_user(&identity, &block).unwrap();
            }
        }
    }

    let excluded: Vec<String> = POOL
        .iter()
        .zip(&pop.excluded)
        .filter(|(_, excluded)| **excluded)
        .map(|(user, _)| user.to_string())
        .collect();

    Fixture {
        domain: DomainConfig::new("CORP", snapshot),
        store,
        rules: ExclusionRules::new(excluded, Vec::new()),
        _dir: dir,
    }
}

fn run(fx: &Fixture) -> ldapsync::application::SyncResult {
    let directory = Arc::new(SnapshotDirectory::new());
    ReconcileUseCase::new(Arc::clone(&directory), directory, &fx.store, &fx.store).sync(
        std::slice::from_ref(&fx.domain),
        &fx.rules,
        &ReconcileOptions::default(),
        &RunContext::new(),
    )
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 48,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: after one run every listed user has an active account,
    /// every unlisted non-excluded account is disabled, and excluded
    /// accounts keep their previous state.
    #[test]
    fn property_sync_converges(pop in population()) {
        let fx = fixture(&pop);
        let result = run(&fx);
        prop_assert!(result.ok());
        prop_assert!(!result.has_failures());

        let users = fx.store.read_users().unwrap();
        for (i, user) in POOL.iter().enumerate() {
            let key = name(user);
            if pop.listed[i] {
                let account = users.get(&key);
                prop_assert!(account.is_some(), "{} missing", user);
                prop_assert!(!account.unwrap().disabled, "{} still disabled", user);
            } else if let Some(was_disabled) = pop.local[i] {
                let expected = if pop.excluded[i] { was_disabled } else { true };
                prop_assert_eq!(users[&key].disabled, expected, "{}", user);
            } else {
                prop_assert!(!users.contains_key(&key));
            }
        }
    }

    /// PROPERTY: a second run over an unchanged directory does nothing.
    #[test]
    fn property_second_run_is_a_no_op(pop in population()) {
        let fx = fixture(&pop);
        prop_assert!(run(&fx).ok());
        let before = fx.store.read_users().unwrap();

        let second = run(&fx);
        prop_assert!(second.ok());
        prop_assert_eq!(second.attempts(), 0);
        prop_assert_eq!(fx.store.read_users().unwrap(), before);
    }

    /// PROPERTY: accounts are only ever created for listed users.
    #[test]
    fn property_no_unlisted_account_is_created(pop in population()) {
        let fx = fixture(&pop);
        let before: BTreeSet<Username> = fx.store.read_users().unwrap().into_keys().collect();
        prop_assert!(run(&fx).ok());
        let after: BTreeSet<Username> = fx.store.read_users().unwrap().into_keys().collect();

        for created in after.difference(&before) {
            let listed = POOL
                .iter()
                .zip(&pop.listed)
                .any(|(user, listed)| *listed && name(user) == *created);
            prop_assert!(listed, "{} created without being listed", created);
        }
    }
}
