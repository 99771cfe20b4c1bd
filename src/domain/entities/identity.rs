//! Identity entity
//!
//! One account, either read from the local store or sourced from a
//! directory listing. Identities are rebuilt from scratch every run and
//! never persisted by the reconciler itself.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{DomainName, Username};

/// Profile data taken from the directory; only used when creating an account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserAttributes {
    pub fn is_empty(&self) -> bool {
        self.real_name.is_none() && self.email.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: Username,
    /// Directory source this account belongs to, if known
    pub domain: Option<DomainName>,
    /// Present once the account exists locally
    pub local_id: Option<u64>,
    pub disabled: bool,
    pub attributes: UserAttributes,
}

impl Identity {
    /// A directory-only record that has no local account yet
    pub fn from_directory(username: Username, domain: DomainName) -> Self {
        Self {
            username,
            domain: Some(domain),
            local_id: None,
            disabled: false,
            attributes: UserAttributes::default(),
        }
    }

    /// An account that exists in the local store
    pub fn local(local_id: u64, username: Username) -> Self {
        Self {
            username,
            domain: None,
            local_id: Some(local_id),
            disabled: false,
            attributes: UserAttributes::default(),
        }
    }

    pub fn with_domain(mut self, domain: DomainName) -> Self {
        self.domain = Some(domain);
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_attributes(mut self, attributes: UserAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn is_local(&self) -> bool {
        self.local_id.is_some()
    }

    pub fn is_active(&self) -> bool {
        self.is_local() && !self.disabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> Username {
        Username::canonicalize(s).unwrap()
    }

    #[test]
    fn directory_identity_is_not_local() {
        let id = Identity::from_directory(name("carol"), DomainName::from("LDAP"));
        assert!(!id.is_local());
        assert!(!id.is_active());
        assert_eq!(id.domain, Some(DomainName::from("LDAP")));
    }

    #[test]
    fn disabled_local_identity_is_not_active() {
        let id = Identity::local(7, name("dave")).with_disabled(true);
        assert!(id.is_local());
        assert!(!id.is_active());
    }

    #[test]
    fn attributes_empty_by_default() {
        assert!(UserAttributes::default().is_empty());
        let attrs = UserAttributes {
            real_name: Some("Eve Example".to_string()),
            email: None,
        };
        assert!(!attrs.is_empty());
    }
}
