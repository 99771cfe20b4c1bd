//! Domain configuration entity
//!
//! Per-domain settings, immutable for the duration of a run. The
//! sections mirror the concerns a directory domain carries:
//! - `connection` - where and how to read the directory
//! - `authorization` - eligibility rules (required group membership)
//! - `user_info` - which directory attributes feed the local profile
//! - `groups` - directory group to local group mapping for group sync

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::policies::GroupRequirements;
use crate::domain::value_objects::DomainName;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainConfig {
    pub name: DomainName,

    pub connection: ConnectionSettings,

    #[serde(default)]
    pub authorization: AuthorizationRules,

    #[serde(default)]
    pub user_info: AttributeMapping,

    #[serde(default)]
    pub groups: GroupSyncSettings,
}

impl DomainConfig {
    pub fn new(name: impl Into<String>, snapshot: impl Into<PathBuf>) -> Self {
        Self {
            name: DomainName::new(name),
            connection: ConnectionSettings::new(snapshot),
            authorization: AuthorizationRules::default(),
            user_info: AttributeMapping::default(),
            groups: GroupSyncSettings::default(),
        }
    }

    pub fn with_required_groups(mut self, groups: Vec<String>) -> Self {
        self.authorization.required_groups = groups;
        self
    }

    pub fn with_group_map(mut self, map: BTreeMap<String, String>) -> Self {
        self.groups.map = map;
        self
    }
}

/// Directory connection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionSettings {
    /// Directory export read for this domain
    pub snapshot: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dn: Option<String>,

    #[serde(default = "default_username_attribute")]
    pub username_attribute: String,

    #[serde(default = "default_groups_attribute")]
    pub groups_attribute: String,

    /// Boolean attribute marking an account disabled in the directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled_attribute: Option<String>,
}

impl ConnectionSettings {
    pub fn new(snapshot: impl Into<PathBuf>) -> Self {
        Self {
            snapshot: snapshot.into(),
            base_dn: None,
            username_attribute: default_username_attribute(),
            groups_attribute: default_groups_attribute(),
            disabled_attribute: None,
        }
    }
}

fn default_username_attribute() -> String {
    "samaccountname".to_string()
}

fn default_groups_attribute() -> String {
    "memberof".to_string()
}

/// Eligibility rules. Each entry is a requirement expression: one group
/// name, or several joined with `|` (any of them). All entries must hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationRules {
    #[serde(default)]
    pub required_groups: Vec<String>,
}

impl AuthorizationRules {
    pub fn requirements(&self) -> GroupRequirements {
        GroupRequirements::new(self.required_groups.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeMapping {
    #[serde(default = "default_real_name_attribute")]
    pub real_name: String,

    #[serde(default = "default_email_attribute")]
    pub email: String,
}

impl Default for AttributeMapping {
    fn default() -> Self {
        Self {
            real_name: default_real_name_attribute(),
            email: default_email_attribute(),
        }
    }
}

fn default_real_name_attribute() -> String {
    "cn".to_string()
}

fn default_email_attribute() -> String {
    "mail".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupSyncSettings {
    /// directory group -> local group
    #[serde(default)]
    pub map: BTreeMap<String, String>,

    /// Local groups owned by group sync (removed when no longer mapped).
    /// Mapped targets are always managed.
    #[serde(default)]
    pub managed: Vec<String>,
}

impl GroupSyncSettings {
    pub fn is_managed(&self, local_group: &str) -> bool {
        self.managed.iter().any(|g| g == local_group) || self.map.values().any(|g| g == local_group)
    }
}
