//! Property tests for the two-set diff.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;

use ldapsync::domain::entities::{DirectoryListing, Identity};
use ldapsync::domain::services::{Eligibility, PlanMode, Planner};
use ldapsync::domain::value_objects::{DomainName, Username};

const POOL: &[&str] = &["alice", "bob", "carol", "dave", "erin", "frank", "grace", "heidi"];

/// (listed, local state) per pool name; local state `None` = no account,
/// `Some(disabled)` otherwise
fn population() -> impl Strategy<Value = Vec<(bool, Option<bool>)>> {
    proptest::collection::vec((any::<bool>(), proptest::option::of(any::<bool>())), POOL.len())
}

fn build(
    population: &[(bool, Option<bool>)],
) -> (DirectoryListing, BTreeMap<Username, Identity>) {
    let domain = DomainName::from("CORP");
    let mut listed = Vec::new();
    let mut local = BTreeMap::new();
    for (i, (in_directory, state)) in population.iter().enumerate() {
        let name = Username::canonicalize(POOL[i]).unwrap();
        if *in_directory {
            listed.push(name.clone());
        }
        if let Some(disabled) = state {
            local.insert(
                name.clone(),
                Identity::local(i as u64 + 1, name).with_disabled(*disabled),
            );
        }
    }
    let mut listing = DirectoryListing::new();
    listing.add_domain(&domain, listed);
    (listing, local)
}

fn all_eligible(listing: &DirectoryListing) -> BTreeMap<Username, Eligibility> {
    listing
        .entries()
        .map(|(u, _)| (u.clone(), Eligibility::Eligible))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: add, enable, keep and disable are disjoint and cover
    /// exactly the directory set plus the active unlisted local accounts.
    #[test]
    fn property_sync_all_partitions_accounts(pop in population()) {
        let (listing, local) = build(&pop);
        let plan = Planner::plan(PlanMode::SyncAll, &listing, &all_eligible(&listing), &local);

        let add: BTreeSet<_> = plan.add.iter().map(|a| a.identity.username.clone()).collect();
        let enable: BTreeSet<_> = plan.enable.iter().map(|a| a.identity.username.clone()).collect();
        let keep: BTreeSet<_> = plan.keep.iter().map(|a| a.identity.username.clone()).collect();
        let disable: BTreeSet<_> = plan.disable.iter().map(|i| i.username.clone()).collect();

        prop_assert!(add.is_disjoint(&enable));
        prop_assert!(add.is_disjoint(&keep));
        prop_assert!(enable.is_disjoint(&keep));

        let directory: BTreeSet<_> = listing.entries().map(|(u, _)| u.clone()).collect();
        let covered: BTreeSet<_> = add.union(&enable).chain(keep.iter()).cloned().collect();
        prop_assert_eq!(&covered, &directory);
        prop_assert!(disable.is_disjoint(&directory));

        for name in &add {
            prop_assert!(!local.contains_key(name));
        }
        for name in &enable {
            prop_assert!(local[name].disabled);
        }
        let expected_disable: BTreeSet<_> = local
            .values()
            .filter(|i| !i.disabled && !directory.contains(&i.username))
            .map(|i| i.username.clone())
            .collect();
        prop_assert_eq!(disable, expected_disable);
    }

    /// PROPERTY: disable-only never adds or enables, and disables exactly
    /// the active local accounts missing from the directory.
    #[test]
    fn property_disable_only_is_set_difference(pop in population()) {
        let (listing, local) = build(&pop);
        let plan = Planner::plan(PlanMode::DisableOnly, &listing, &BTreeMap::new(), &local);

        prop_assert!(plan.add.is_empty());
        prop_assert!(plan.enable.is_empty());
        for identity in &plan.disable {
            prop_assert!(!listing.contains(&identity.username));
            prop_assert!(!identity.disabled);
        }
        let expected = local
            .values()
            .filter(|i| !i.disabled && !listing.contains(&i.username))
            .count();
        prop_assert_eq!(plan.disable.len(), expected);
    }

    /// PROPERTY: a failed domain protects every unlisted account of
    /// unknown domain; nothing of unknown ownership is disabled.
    #[test]
    fn property_failed_domain_blocks_unknown_disables(pop in population()) {
        let (mut listing, local) = build(&pop);
        listing.mark_failed(&DomainName::from("LAB"));
        let plan = Planner::plan(PlanMode::SyncAll, &listing, &all_eligible(&listing), &local);

        prop_assert!(plan.disable.is_empty());
    }
}
