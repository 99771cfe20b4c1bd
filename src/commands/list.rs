use std::path::Path;

use anyhow::Result;

use ldapsync::domain::ports::DirectoryLister;
use ldapsync::error::LdapSyncError;
use ldapsync::infrastructure::SnapshotDirectory;

pub fn cmd_list(config_path: Option<&Path>, domain: &str, json: bool) -> Result<()> {
    let config = super::load_config(config_path)?;
    let domains = config.domain_configs();
    let domain = domains
        .iter()
        .find(|d| d.name.as_str() == domain)
        .ok_or_else(|| LdapSyncError::UnknownDomain(domain.to_string()))?;

    let directory = SnapshotDirectory::new();
    let mut usernames = directory
        .list_usernames(domain)
        .map_err(|source| LdapSyncError::Directory {
            domain: domain.name.to_string(),
            source,
        })?;
    usernames.sort();
    usernames.dedup();

    if json {
        println!(
            "{}",
            serde_json::json!({
                "event": "list",
                "domain": domain.name,
                "usernames": usernames,
            })
        );
    } else {
        for name in &usernames {
            println!("{}", name);
        }
    }
    Ok(())
}
