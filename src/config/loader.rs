//! Configuration loading and validation

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::application::SyncMechanism;
use crate::error::{LdapSyncError, LdapSyncResult};

use super::types::Config;

const PROJECT_CONFIG: &str = "ldapsync.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> LdapSyncResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let mut config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| LdapSyncError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    config.base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// `./ldapsync.toml` if present, else the user config file if present
pub fn default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from(PROJECT_CONFIG);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("ldapsync").join("config.toml"))
        .filter(|p| p.exists())
}

/// Apply environment variable overrides (LDAPSYNC_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    apply_overrides(config, |key| std::env::var(key).ok())
}

pub(crate) fn apply_overrides<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    // LDAPSYNC_MECHANISM
    if let Some(mechanism) = lookup("LDAPSYNC_MECHANISM") {
        match mechanism.parse::<SyncMechanism>() {
            Ok(parsed) => config.sync.mechanism = parsed,
            Err(e) => tracing::warn!(error = %e, "ignoring LDAPSYNC_MECHANISM"),
        }
    }

    // LDAPSYNC_ABORT_ON_DOMAIN_ERROR
    if let Some(val) = lookup("LDAPSYNC_ABORT_ON_DOMAIN_ERROR") {
        config.sync.abort_on_domain_error = is_truthy(&val);
    }

    // LDAPSYNC_DRY_RUN
    if let Some(val) = lookup("LDAPSYNC_DRY_RUN") {
        config.sync.dry_run = is_truthy(&val);
    }

    // LDAPSYNC_EXCLUDED_USERNAMES (comma-separated)
    if let Some(names) = lookup("LDAPSYNC_EXCLUDED_USERNAMES") {
        let parsed: Vec<String> = names
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if !parsed.is_empty() {
            config.exclusions.usernames = parsed;
        }
    }

    config
}

fn is_truthy(val: &str) -> bool {
    let val = val.trim().to_lowercase();
    val != "false" && val != "0" && val != "no"
}

/// At least one domain, unique names, a snapshot for every domain
pub fn validate(config: &Config) -> LdapSyncResult<()> {
    if config.domains.is_empty() {
        return Err(LdapSyncError::NoDomains);
    }

    let mut seen = BTreeSet::new();
    for domain in &config.domains {
        if domain.name.trim().is_empty() {
            return Err(LdapSyncError::Config("domain name must not be empty".to_string()));
        }
        if !seen.insert(domain.name.as_str()) {
            return Err(LdapSyncError::Config(format!(
                "domain '{}' is configured more than once",
                domain.name
            )));
        }
        if domain.snapshot.as_os_str().is_empty() {
            return Err(LdapSyncError::Config(format!(
                "domain '{}' has no snapshot path",
                domain.name
            )));
        }
    }

    if config.sync.executor.trim().is_empty() {
        return Err(LdapSyncError::Config("sync.executor must not be empty".to_string()));
    }

    Ok(())
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "sync",
        "mechanism",
        "abort_on_domain_error",
        "dry_run",
        "enrich_all_active",
        "call_timeout_secs",
        "run_timeout_secs",
        "block_reason",
        "block_tags",
        "executor",
        "exclusions",
        "usernames",
        "groups",
        "store",
        "path",
        "pages",
        "dir",
        "content",
        "domains",
        "name",
        "snapshot",
        "base_dn",
        "username_attribute",
        "groups_attribute",
        "disabled_attribute",
        "required_groups",
        "group_map",
        "managed_groups",
        "attributes",
        "real_name",
        "email",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
