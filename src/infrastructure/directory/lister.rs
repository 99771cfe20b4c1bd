//! Snapshot-backed directory
//!
//! Implements the directory ports on top of snapshot files, one per
//! domain. Each file is read at most once per run.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::domain::entities::{DomainConfig, UserAttributes};
use crate::domain::ports::{DirectoryError, DirectoryLister, DirectoryResult, EligibilityChecker};
use crate::domain::value_objects::Username;

use super::snapshot::{DirectoryEntry, DirectorySnapshot, SnapshotError};

#[derive(Default)]
pub struct SnapshotDirectory {
    cache: Mutex<HashMap<PathBuf, Arc<DirectorySnapshot>>>,
}

impl SnapshotDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(&self, domain: &DomainConfig) -> DirectoryResult<Arc<DirectorySnapshot>> {
        let path = &domain.connection.snapshot;
        if let Some(cached) = self.cached(path) {
            return Ok(cached);
        }

        let loaded = Arc::new(DirectorySnapshot::load(path).map_err(to_directory_error)?);
        debug!(domain = %domain.name, path = %path.display(), entries = loaded.entries().len(), "snapshot loaded");
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.clone(), Arc::clone(&loaded));
        Ok(loaded)
    }

    fn cached(&self, path: &Path) -> Option<Arc<DirectorySnapshot>> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .map(Arc::clone)
    }

    /// Entries of `domain` that are in scope and carry a usable username
    fn users<'s>(
        snapshot: &'s DirectorySnapshot,
        domain: &'s DomainConfig,
    ) -> impl Iterator<Item = (Username, &'s DirectoryEntry)> + 's {
        let attribute = domain.connection.username_attribute.as_str();
        snapshot
            .entries()
            .iter()
            .filter(move |entry| match &domain.connection.base_dn {
                Some(base) => entry.is_under(base),
                None => true,
            })
            .filter_map(move |entry| {
                let name = entry.first(attribute).and_then(Username::canonicalize)?;
                Some((name, entry))
            })
    }

    fn find(&self, username: &Username, domain: &DomainConfig) -> DirectoryResult<DirectoryEntry> {
        let snapshot = self.snapshot(domain)?;
        let found = Self::users(&snapshot, domain)
            .find(|(name, _)| name == username)
            .map(|(_, entry)| entry.clone());
        found.ok_or_else(|| DirectoryError::UnknownUser(username.clone()))
    }

    /// Directory group names of one user
    pub fn group_names(&self, username: &Username, domain: &DomainConfig) -> DirectoryResult<Vec<String>> {
        let entry = self.find(username, domain)?;
        Ok(entry.group_names(&domain.connection.groups_attribute))
    }
}

impl DirectoryLister for SnapshotDirectory {
    fn list_usernames(&self, domain: &DomainConfig) -> DirectoryResult<Vec<Username>> {
        let snapshot = self.snapshot(domain)?;
        let total = snapshot.entries().len();
        let usernames: Vec<Username> = Self::users(&snapshot, domain).map(|(name, _)| name).collect();
        if usernames.len() < total {
            debug!(
                domain = %domain.name,
                skipped = total - usernames.len(),
                "entries without username or outside base DN"
            );
        }
        Ok(usernames)
    }

    fn user_attributes(
        &self,
        username: &Username,
        domain: &DomainConfig,
    ) -> DirectoryResult<UserAttributes> {
        let entry = self.find(username, domain)?;
        Ok(UserAttributes {
            real_name: entry.first(&domain.user_info.real_name).map(str::to_string),
            email: entry.first(&domain.user_info.email).map(str::to_string),
        })
    }
}

impl EligibilityChecker for SnapshotDirectory {
    fn is_eligible(&self, username: &Username, domain: &DomainConfig) -> DirectoryResult<bool> {
        let entry = self.find(username, domain)?;

        if let Some(flag) = &domain.connection.disabled_attribute {
            if entry.is_flagged(flag) {
                debug!(username = %username, attribute = %flag, "disabled in directory");
                return Ok(false);
            }
        }

        let requirements = domain.authorization.requirements();
        let groups = entry.group_names(&domain.connection.groups_attribute);
        if let Some(unmet) = requirements.first_unmet(&groups) {
            debug!(username = %username, requirement = unmet, "group requirement not met");
            return Ok(false);
        }
        Ok(true)
    }
}

fn to_directory_error(err: SnapshotError) -> DirectoryError {
    match err {
        SnapshotError::Io { .. } => DirectoryError::Unreachable(err.to_string()),
        SnapshotError::Parse { .. } | SnapshotError::UnsupportedFormat(_) => {
            DirectoryError::InvalidData(err.to_string())
        }
    }
}
