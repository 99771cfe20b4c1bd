//! Directory listing entity
//!
//! Merged view over the per-domain directory listings of one run.
//! Usernames of each domain are sorted before merging; when the same
//! username appears in several domains the first domain in configured
//! order owns it.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::value_objects::{DomainName, Username};

#[derive(Debug, Clone, Default)]
pub struct DirectoryListing {
    /// (username, owning domain) in action order
    ordered: Vec<(Username, DomainName)>,
    owner: BTreeMap<Username, DomainName>,
    listed: Vec<DomainName>,
    failed: Vec<DomainName>,
}

impl DirectoryListing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge the listing of one domain. Returns how many usernames the
    /// domain contributed (duplicates owned by earlier domains excluded).
    pub fn add_domain<I>(&mut self, domain: &DomainName, usernames: I) -> usize
    where
        I: IntoIterator<Item = Username>,
    {
        let sorted: BTreeSet<Username> = usernames.into_iter().collect();
        let mut contributed = 0;
        for username in sorted {
            if self.owner.contains_key(&username) {
                continue;
            }
            self.owner.insert(username.clone(), domain.clone());
            self.ordered.push((username, domain.clone()));
            contributed += 1;
        }
        self.listed.push(domain.clone());
        contributed
    }

    /// Record a domain whose listing could not be obtained this run
    pub fn mark_failed(&mut self, domain: &DomainName) {
        if !self.failed.contains(domain) {
            self.failed.push(domain.clone());
        }
    }

    pub fn contains(&self, username: &Username) -> bool {
        self.owner.contains_key(username)
    }

    pub fn domain_of(&self, username: &Username) -> Option<&DomainName> {
        self.owner.get(username)
    }

    /// Entries in action order: configured domain order, then sorted names
    pub fn entries(&self) -> impl Iterator<Item = (&Username, &DomainName)> {
        self.ordered.iter().map(|(u, d)| (u, d))
    }

    pub fn listed_domains(&self) -> &[DomainName] {
        &self.listed
    }

    pub fn failed_domains(&self) -> &[DomainName] {
        &self.failed
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn is_failed(&self, domain: &DomainName) -> bool {
        self.failed.contains(domain)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}
