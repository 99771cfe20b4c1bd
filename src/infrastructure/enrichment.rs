//! Directory Enricher
//!
//! Attribute sync copies the mapped profile attributes from the
//! directory into the store. Group sync maps directory groups to local
//! groups through the domain's `group_map`; local groups that are
//! managed but no longer mapped are removed, unmanaged ones are kept.

use tracing::debug;

use crate::domain::entities::{DomainConfig, Identity};
use crate::domain::ports::{DirectoryLister, Enrichment, EnrichmentError, EnrichmentStep, GroupMembership};

use super::directory::SnapshotDirectory;
use super::store::TomlUserStore;

pub struct DirectoryEnricher<'a> {
    directory: &'a SnapshotDirectory,
    store: &'a TomlUserStore,
}

impl<'a> DirectoryEnricher<'a> {
    pub fn new(directory: &'a SnapshotDirectory, store: &'a TomlUserStore) -> Self {
        Self { directory, store }
    }
}

impl Enrichment for DirectoryEnricher<'_> {
    fn sync_attributes(
        &self,
        identity: &Identity,
        domain: &DomainConfig,
    ) -> Result<(), EnrichmentError> {
        let attributes = self
            .directory
            .user_attributes(&identity.username, domain)
            .map_err(|e| step_error(EnrichmentStep::Attributes, e))?;
        if attributes.is_empty() || attributes == identity.attributes {
            return Ok(());
        }
        self.store
            .set_attributes(&identity.username, &attributes)
            .map_err(|e| step_error(EnrichmentStep::Attributes, e))?;
        debug!(username = %identity.username, "attributes synced");
        Ok(())
    }

    fn sync_groups(&self, identity: &Identity, domain: &DomainConfig) -> Result<(), EnrichmentError> {
        let directory_groups = self
            .directory
            .group_names(&identity.username, domain)
            .map_err(|e| step_error(EnrichmentStep::Groups, e))?;
        let current = self.store.groups_of(identity).map_err(|e| step_error(EnrichmentStep::Groups, e))?;

        let desired = merge_groups(&current, &directory_groups, domain);
        if desired == current {
            return Ok(());
        }
        self.store
            .set_groups(&identity.username, desired)
            .map_err(|e| step_error(EnrichmentStep::Groups, e))?;
        debug!(username = %identity.username, "groups synced");
        Ok(())
    }
}

fn step_error(step: EnrichmentStep, err: impl std::fmt::Display) -> EnrichmentError {
    EnrichmentError::new(step, err.to_string())
}

/// Unmanaged local groups plus every local group mapped from the
/// directory groups, in first-seen order
fn merge_groups(current: &[String], directory_groups: &[String], domain: &DomainConfig) -> Vec<String> {
    let settings = &domain.groups;
    let mut desired: Vec<String> = current
        .iter()
        .filter(|g| !settings.is_managed(g))
        .cloned()
        .collect();

    for group in directory_groups {
        let mapped = settings
            .map
            .iter()
            .find(|(from, _)| from.eq_ignore_ascii_case(group))
            .map(|(_, to)| to);
        if let Some(local) = mapped {
            if !desired.contains(local) {
                desired.push(local.clone());
            }
        }
    }
    desired
}
