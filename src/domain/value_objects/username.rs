//! Username value object - the canonical identity key
//!
//! Directory exports and the local store spell the same account in
//! different ways (`John_Doe`, `john doe`, ` JOHN  DOE `). Every
//! comparison goes through [`Username::canonicalize`] so both sides
//! collapse to one form:
//!
//! - surrounding whitespace trimmed
//! - `_` treated as a space
//! - runs of whitespace collapsed to a single space
//! - lower-cased

use serde::{Deserialize, Serialize};

/// Canonical username, unique within a domain for one run
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Canonicalize a raw username. Returns `None` for blank input.
    pub fn canonicalize(raw: &str) -> Option<Self> {
        let collapsed = raw
            .replace('_', " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        if collapsed.is_empty() {
            None
        } else {
            Some(Self(collapsed))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Username::canonicalize(&value).ok_or_else(|| "username must not be blank".to_string())
    }
}

impl From<Username> for String {
    fn from(name: Username) -> Self {
        name.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
