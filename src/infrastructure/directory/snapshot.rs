//! Directory snapshot files
//!
//! A snapshot is an export of directory user entries (for example an
//! `ldapsearch` dump converted to JSON). Attribute names are matched
//! case-insensitively, as LDAP does; every value is kept as a list.
//!
//! ```yaml
//! entries:
//!   - dn: CN=John Doe,OU=Users,DC=corp,DC=example
//!     sAMAccountName: John_Doe
//!     mail: john@corp.example
//!     memberOf:
//!       - CN=Wiki Users,OU=Groups,DC=corp,DC=example
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("cannot read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid snapshot {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("unsupported snapshot format: {0} (expected .json, .yaml, .yml or .toml)")]
    UnsupportedFormat(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Yaml,
    Toml,
}

impl SnapshotFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(SnapshotFormat::Json),
            "yaml" | "yml" => Some(SnapshotFormat::Yaml),
            "toml" => Some(SnapshotFormat::Toml),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Text(String),
    Flag(bool),
    Number(i64),
    List(Vec<String>),
}

impl RawValue {
    fn into_values(self) -> Vec<String> {
        match self {
            RawValue::Text(s) => vec![s],
            RawValue::Flag(b) => vec![b.to_string()],
            RawValue::Number(n) => vec![n.to_string()],
            RawValue::List(items) => items,
        }
    }
}

type RawEntry = BTreeMap<String, RawValue>;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDocument {
    Wrapped { entries: Vec<RawEntry> },
    Bare(Vec<RawEntry>),
}

/// One directory object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryEntry {
    attributes: BTreeMap<String, Vec<String>>,
}

impl DirectoryEntry {
    pub fn new<I, K, V>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<V>)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            attributes: attributes
                .into_iter()
                .map(|(k, vs)| {
                    (
                        k.as_ref().to_ascii_lowercase(),
                        vs.into_iter().map(Into::into).collect(),
                    )
                })
                .collect(),
        }
    }

    pub fn values(&self, attribute: &str) -> &[String] {
        self.attributes
            .get(&attribute.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn first(&self, attribute: &str) -> Option<&str> {
        self.values(attribute)
            .first()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    pub fn dn(&self) -> Option<&str> {
        self.first("dn")
    }

    /// Group names (CNs) of the group DNs held in `attribute`
    pub fn group_names(&self, attribute: &str) -> Vec<String> {
        self.values(attribute)
            .iter()
            .filter_map(|dn| common_name(dn))
            .collect()
    }

    /// Whether a flag attribute marks the entry. `userAccountControl`
    /// is read as the AD bit field (0x2 = account disabled).
    pub fn is_flagged(&self, attribute: &str) -> bool {
        let Some(value) = self.first(attribute) else {
            return false;
        };
        if attribute.eq_ignore_ascii_case("useraccountcontrol") {
            return value.parse::<u32>().map(|uac| uac & 0x2 != 0).unwrap_or(false);
        }
        matches!(
            value.to_ascii_lowercase().as_str(),
            "true" | "yes" | "1"
        )
    }

    /// Entry lies under `base_dn` (suffix match, case-insensitive)
    pub fn is_under(&self, base_dn: &str) -> bool {
        match self.dn() {
            Some(dn) => dn
                .to_ascii_lowercase()
                .replace(", ", ",")
                .ends_with(&base_dn.to_ascii_lowercase().replace(", ", ",")),
            None => false,
        }
    }
}

/// Parsed snapshot file
#[derive(Debug, Clone, Default)]
pub struct DirectorySnapshot {
    entries: Vec<DirectoryEntry>,
}

impl DirectorySnapshot {
    pub fn from_entries(entries: Vec<DirectoryEntry>) -> Self {
        Self { entries }
    }

    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let format = SnapshotFormat::from_path(path)
            .ok_or_else(|| SnapshotError::UnsupportedFormat(path.to_path_buf()))?;
        let content = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, format).map_err(|message| SnapshotError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn parse(content: &str, format: SnapshotFormat) -> Result<Self, String> {
        let document: RawDocument = match format {
            SnapshotFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string())?,
            SnapshotFormat::Yaml => serde_yaml_ng::from_str(content).map_err(|e| e.to_string())?,
            SnapshotFormat::Toml => toml::from_str(content).map_err(|e| e.to_string())?,
        };
        let raw = match document {
            RawDocument::Wrapped { entries } | RawDocument::Bare(entries) => entries,
        };

        Ok(Self {
            entries: raw
                .into_iter()
                .map(|entry| {
                    DirectoryEntry::new(entry.into_iter().map(|(k, v)| (k, v.into_values())))
                })
                .collect(),
        })
    }

    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }
}

/// `CN=Wiki Users,OU=Groups,...` -> `Wiki Users`; plain names pass through
fn common_name(dn: &str) -> Option<String> {
    let first = dn.split(',').next()?.trim();
    let name = match first.split_once('=') {
        Some((_, value)) => value.trim(),
        None => first,
    };
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
