//! TOML User Store
//!
//! Local account database kept in a single TOML file. Every mutation
//! takes an exclusive lock on `<store>.lock`, re-reads the file, applies
//! the change and writes the file back through a temp file.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::warn;

use crate::domain::entities::{Identity, UserAttributes};
use crate::domain::ports::{BlockDetails, GroupMembership, StoreError, StoreResult, UserStore};
use crate::domain::value_objects::{DomainName, Username};

const STORE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredBlock {
    pub reason: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub actor: String,
    pub blocked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredUser {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
    pub created_at: DateTime<Utc>,
    /// Present while the account is disabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<StoredBlock>,
}

impl StoredUser {
    fn to_identity(&self) -> Option<Identity> {
        let username = Username::canonicalize(&self.name)?;
        let mut identity = Identity::local(self.id, username)
            .with_disabled(self.block.is_some())
            .with_attributes(UserAttributes {
                real_name: self.real_name.clone(),
                email: self.email.clone(),
            });
        identity.domain = self.domain.as_deref().map(DomainName::from);
        Some(identity)
    }

    fn matches(&self, username: &Username) -> bool {
        Username::canonicalize(&self.name).as_ref() == Some(username)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    users: Vec<StoredUser>,
}

impl StoreFile {
    fn new() -> Self {
        Self {
            version: STORE_VERSION,
            next_id: 1,
            users: Vec::new(),
        }
    }

    fn find_mut(&mut self, username: &Username) -> StoreResult<&mut StoredUser> {
        self.users
            .iter_mut()
            .rev()
            .find(|u| u.matches(username))
            .ok_or_else(|| StoreError::NotFound(username.clone()))
    }
}

pub struct TomlUserStore {
    path: PathBuf,
}

impl TomlUserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    /// All stored records, in file order
    pub fn records(&self) -> StoreResult<Vec<StoredUser>> {
        Ok(self.load_from_disk()?.users)
    }

    /// Replace profile attributes of one account
    pub fn set_attributes(&self, username: &Username, attributes: &UserAttributes) -> StoreResult<()> {
        self.update(|file| {
            let user = file.find_mut(username)?;
            if attributes.real_name.is_some() {
                user.real_name = attributes.real_name.clone();
            }
            if attributes.email.is_some() {
                user.email = attributes.email.clone();
            }
            Ok(())
        })
    }

    /// Replace the local group list of one account
    pub fn set_groups(&self, username: &Username, groups: Vec<String>) -> StoreResult<()> {
        self.update(|file| {
            file.find_mut(username)?.groups = groups;
            Ok(())
        })
    }

    fn load_from_disk(&self) -> StoreResult<StoreFile> {
        if !self.path.exists() {
            return Ok(StoreFile::new());
        }

        let content = fs::read_to_string(&self.path)?;
        let file: StoreFile = toml::from_str(&content).map_err(|e| {
            StoreError::Unavailable(format!("{} is corrupted: {}", self.path.display(), e))
        })?;
        if file.version > STORE_VERSION {
            return Err(StoreError::Unavailable(format!(
                "{} has unsupported version {}",
                self.path.display(),
                file.version
            )));
        }
        Ok(file)
    }

    fn save_to_disk(&self, file: &StoreFile) -> StoreResult<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)?;

        let content = toml::to_string_pretty(file)
            .map_err(|e| StoreError::Rejected(format!("cannot serialize store: {}", e)))?;

        let mut tmp = NamedTempFile::new_in(&parent)?;
        tmp.write_all(content.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }

    /// Load, modify and save under the store lock
    fn update<T, F>(&self, change: F) -> StoreResult<T>
    where
        F: FnOnce(&mut StoreFile) -> StoreResult<T>,
    {
        let lock_path = self.lock_path();
        if let Some(parent) = lock_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let lock_file = fs::File::create(&lock_path)?;
        lock_file.lock_exclusive()?;

        let outcome = self.load_from_disk().and_then(|mut file| {
            let value = change(&mut file)?;
            self.save_to_disk(&file)?;
            Ok(value)
        });

        let _ = lock_file.unlock();
        outcome
    }
}

impl UserStore for TomlUserStore {
    fn read_users(&self) -> StoreResult<BTreeMap<Username, Identity>> {
        let file = self.load_from_disk()?;
        let mut users = BTreeMap::new();
        for record in &file.users {
            match record.to_identity() {
                Some(identity) => {
                    if let Some(previous) = users.insert(identity.username.clone(), identity) {
                        warn!(username = %previous.username, "duplicate account in store, keeping the last one");
                    }
                }
                None => warn!(id = record.id, "account with blank name ignored"),
            }
        }
        Ok(users)
    }

    fn find_user(&self, username: &Username) -> StoreResult<Option<Identity>> {
        let file = self.load_from_disk()?;
        Ok(file
            .users
            .iter()
            .rev()
            .find(|u| u.matches(username))
            .and_then(StoredUser::to_identity))
    }

    fn create_user(
        &self,
        username: &Username,
        attributes: &UserAttributes,
    ) -> StoreResult<Identity> {
        self.update(|file| {
            if file.users.iter().any(|u| u.matches(username)) {
                return Err(StoreError::AlreadyExists(username.clone()));
            }
            let highest = file.users.iter().map(|u| u.id).max().unwrap_or(0);
            let id = file.next_id.max(highest + 1);
            file.next_id = id + 1;
            let record = StoredUser {
                id,
                name: username.to_string(),
                real_name: attributes.real_name.clone(),
                email: attributes.email.clone(),
                domain: None,
                groups: Vec::new(),
                created_at: Utc::now(),
                block: None,
            };
            let identity = record
                .to_identity()
                .ok_or_else(|| StoreError::Rejected("blank username".to_string()))?;
            file.users.push(record);
            Ok(identity)
        })
    }

    fn disable_user(&self, identity: &Identity, block: &BlockDetails) -> StoreResult<()> {
        self.update(|file| {
            let user = file.find_mut(&identity.username)?;
            user.block = Some(StoredBlock {
                reason: block.reason.clone(),
                tags: block.tags.clone(),
                actor: block.actor.clone(),
                blocked_at: Utc::now(),
            });
            Ok(())
        })
    }

    fn enable_user(&self, identity: &Identity, _actor: &str) -> StoreResult<()> {
        self.update(|file| {
            file.find_mut(&identity.username)?.block = None;
            Ok(())
        })
    }

    fn record_domain(&self, identity: &Identity, domain: &DomainName) -> StoreResult<()> {
        self.update(|file| {
            file.find_mut(&identity.username)?.domain = Some(domain.to_string());
            Ok(())
        })
    }
}

impl GroupMembership for TomlUserStore {
    fn groups_of(&self, identity: &Identity) -> StoreResult<Vec<String>> {
        let file = self.load_from_disk()?;
        Ok(file
            .users
            .iter()
            .find(|u| Some(u.id) == identity.local_id)
            .map(|u| u.groups.clone())
            .unwrap_or_default())
    }
}
