//! Test fixtures - reusable content constants for tests.

/// One domain, no eligibility rules
pub const SINGLE_DOMAIN_CONFIG: &str = r#"
[exclusions]
usernames = ["Admin"]
groups = ["bots"]

[[domains]]
name = "CORP"
snapshot = "corp.json"
"#;

/// Two domains; LAB is listed second
pub const TWO_DOMAIN_CONFIG: &str = r#"
[[domains]]
name = "CORP"
snapshot = "corp.json"

[[domains]]
name = "LAB"
snapshot = "lab.yaml"
username_attribute = "uid"
"#;

/// alice and carol
pub const CORP_SNAPSHOT: &str = r#"[
  {"sAMAccountName": "Alice", "cn": "Alice Example", "mail": "alice@corp.example"},
  {"sAMAccountName": "carol", "cn": "Carol Example"}
]"#;

/// dave only
pub const LAB_SNAPSHOT: &str = r#"
entries:
  - uid: dave
    cn: Dave Lab
"#;

/// Local accounts: admin (excluded by name), bob (gone from the
/// directory), dave (disabled, recorded in LAB), robot (member of `bots`)
pub const EXISTING_STORE: &str = r#"
version = 1
next_id = 5

[[users]]
id = 1
name = "Admin"
created_at = "2024-01-01T00:00:00Z"

[[users]]
id = 2
name = "Bob"
domain = "CORP"
created_at = "2024-01-01T00:00:00Z"

[[users]]
id = 3
name = "Dave"
domain = "LAB"
created_at = "2024-01-01T00:00:00Z"

[users.block]
reason = "User is not in the directory"
tags = ["ldap"]
actor = "Maintenance script"
blocked_at = "2024-06-01T00:00:00Z"

[[users]]
id = 4
name = "Robot"
groups = ["bots"]
created_at = "2024-01-01T00:00:00Z"
"#;
