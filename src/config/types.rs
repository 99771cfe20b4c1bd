//! Configuration type definitions

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::{ReconcileOptions, SyncMechanism};
use crate::application::reconcile::{DEFAULT_BLOCK_REASON, DEFAULT_BLOCK_TAG, DEFAULT_EXECUTOR};
use crate::domain::entities::{
    AttributeMapping, AuthorizationRules, ConnectionSettings, DomainConfig, GroupSyncSettings,
};
use crate::domain::policies::ExclusionRules;
use crate::domain::ports::BlockDetails;
use crate::domain::value_objects::DomainName;
use crate::error::LdapSyncResult;

use super::loader::{self, ConfigWarning};

/// Reconciliation run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub mechanism: SyncMechanism,

    #[serde(default = "default_true")]
    pub abort_on_domain_error: bool,

    #[serde(default)]
    pub dry_run: bool,

    #[serde(default)]
    pub enrich_all_active: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_timeout_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_timeout_secs: Option<u64>,

    #[serde(default = "default_block_reason")]
    pub block_reason: String,

    #[serde(default = "default_block_tags")]
    pub block_tags: Vec<String>,

    /// Recorded as the actor of disable and enable actions
    #[serde(default = "default_executor")]
    pub executor: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            mechanism: SyncMechanism::default(),
            abort_on_domain_error: true,
            dry_run: false,
            enrich_all_active: false,
            call_timeout_secs: None,
            run_timeout_secs: None,
            block_reason: default_block_reason(),
            block_tags: default_block_tags(),
            executor: default_executor(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_block_reason() -> String {
    DEFAULT_BLOCK_REASON.to_string()
}

fn default_block_tags() -> Vec<String> {
    vec![DEFAULT_BLOCK_TAG.to_string()]
}

fn default_executor() -> String {
    DEFAULT_EXECUTOR.to_string()
}

/// Local user store location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("users.toml")
}

/// User pages created for new accounts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagesConfig {
    #[serde(default = "default_pages_dir")]
    pub dir: PathBuf,

    /// No page is published when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            dir: default_pages_dir(),
            content: None,
        }
    }
}

fn default_pages_dir() -> PathBuf {
    PathBuf::from("pages")
}

/// One `[[domains]]` entry
///
/// ```toml
/// [[domains]]
/// name = "CORP"
/// snapshot = "corp.json"
/// required_groups = ["wiki-users|wiki-admins"]
///
/// [domains.group_map]
/// "Wiki Admins" = "sysop"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEntry {
    pub name: String,

    /// Directory export read for this domain
    pub snapshot: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username_attribute: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups_attribute: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled_attribute: Option<String>,

    #[serde(default)]
    pub required_groups: Vec<String>,

    #[serde(default)]
    pub group_map: BTreeMap<String, String>,

    #[serde(default)]
    pub managed_groups: Vec<String>,

    #[serde(default)]
    pub attributes: AttributeMapping,
}

impl DomainEntry {
    pub fn new(name: impl Into<String>, snapshot: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            snapshot: snapshot.into(),
            base_dn: None,
            username_attribute: None,
            groups_attribute: None,
            disabled_attribute: None,
            required_groups: Vec::new(),
            group_map: BTreeMap::new(),
            managed_groups: Vec::new(),
            attributes: AttributeMapping::default(),
        }
    }

    /// Domain settings with the snapshot path resolved against `base`
    pub fn to_domain_config(&self, base: &Path) -> DomainConfig {
        let mut connection = ConnectionSettings::new(resolve(base, &self.snapshot));
        connection.base_dn = self.base_dn.clone();
        if let Some(attr) = &self.username_attribute {
            connection.username_attribute = attr.to_lowercase();
        }
        if let Some(attr) = &self.groups_attribute {
            connection.groups_attribute = attr.to_lowercase();
        }
        connection.disabled_attribute = self.disabled_attribute.as_ref().map(|a| a.to_lowercase());

        DomainConfig {
            name: DomainName::new(self.name.clone()),
            connection,
            authorization: AuthorizationRules {
                required_groups: self.required_groups.clone(),
            },
            user_info: AttributeMapping {
                real_name: self.attributes.real_name.to_lowercase(),
                email: self.attributes.email.to_lowercase(),
            },
            groups: GroupSyncSettings {
                map: self.group_map.clone(),
                managed: self.managed_groups.clone(),
            },
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub sync: SyncConfig,

    #[serde(default)]
    pub exclusions: ExclusionRules,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub pages: PagesConfig,

    #[serde(default)]
    pub domains: Vec<DomainEntry>,

    /// Directory relative paths are resolved against (the config file's)
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> LdapSyncResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> LdapSyncResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Config file used when none is given on the command line
    pub fn default_path() -> Option<PathBuf> {
        loader::default_config_path()
    }

    /// Apply environment variable overrides (LDAPSYNC_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }

    /// Reject configurations that cannot be reconciled safely
    pub fn validate(&self) -> LdapSyncResult<()> {
        loader::validate(self)
    }

    /// Domains in configured order, paths resolved
    pub fn domain_configs(&self) -> Vec<DomainConfig> {
        self.domains
            .iter()
            .map(|d| d.to_domain_config(&self.base_dir))
            .collect()
    }

    pub fn store_path(&self) -> PathBuf {
        resolve(&self.base_dir, &self.store.path)
    }

    pub fn pages_dir(&self) -> PathBuf {
        resolve(&self.base_dir, &self.pages.dir)
    }

    pub fn run_timeout(&self) -> Option<Duration> {
        self.sync.run_timeout_secs.map(Duration::from_secs)
    }

    /// Reconcile options described by the `[sync]` and `[pages]` sections
    pub fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions::new()
            .with_mechanism(self.sync.mechanism)
            .with_abort_on_domain_error(self.sync.abort_on_domain_error)
            .with_dry_run(self.sync.dry_run)
            .with_enrich_all_active(self.sync.enrich_all_active)
            .with_call_timeout(self.sync.call_timeout_secs.map(Duration::from_secs))
            .with_block(BlockDetails {
                reason: self.sync.block_reason.clone(),
                tags: self.sync.block_tags.clone(),
                actor: self.sync.executor.clone(),
            })
            .with_user_page_content(self.pages.content.clone())
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
