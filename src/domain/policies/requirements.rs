//! Group requirements for eligibility
//!
//! Each requirement is an expression naming one or more directory
//! groups separated by `|`; a requirement holds when the user is in any
//! of them. A user is eligible when every requirement holds. Group names
//! compare case-insensitively, as directory group CNs do.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupRequirements(Vec<String>);

impl GroupRequirements {
    pub fn new(requirements: Vec<String>) -> Self {
        Self(requirements)
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|r| alternatives(r).next().is_none())
    }

    /// True when `member_of` satisfies every requirement
    pub fn satisfied_by<S: AsRef<str>>(&self, member_of: &[S]) -> bool {
        self.0.iter().all(|requirement| {
            let mut options = alternatives(requirement).peekable();
            if options.peek().is_none() {
                return true;
            }
            options.any(|wanted| {
                member_of
                    .iter()
                    .any(|group| group.as_ref().trim().eq_ignore_ascii_case(wanted))
            })
        })
    }

    /// First requirement `member_of` fails, for diagnostics
    pub fn first_unmet<S: AsRef<str>>(&self, member_of: &[S]) -> Option<&str> {
        self.0
            .iter()
            .find(|r| !GroupRequirements::new(vec![(*r).clone()]).satisfied_by(member_of))
            .map(String::as_str)
    }
}

fn alternatives(requirement: &str) -> impl Iterator<Item = &str> {
    requirement.split('|').map(str::trim).filter(|s| !s.is_empty())
}
