use std::path::Path;

use anyhow::Result;

use ldapsync::domain::ports::DirectoryLister;
use ldapsync::infrastructure::SnapshotDirectory;

pub fn cmd_check(config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = super::load_config(config_path)?;
    config.validate()?;

    let directory = SnapshotDirectory::new();
    let mut failures = 0;
    let mut domains = Vec::new();
    for domain in config.domain_configs() {
        let listed = directory.list_usernames(&domain);
        if listed.is_err() {
            failures += 1;
        }
        domains.push((domain, listed));
    }

    if json {
        let entries: Vec<serde_json::Value> = domains
            .iter()
            .map(|(domain, listed)| match listed {
                Ok(users) => serde_json::json!({
                    "domain": domain.name,
                    "snapshot": domain.connection.snapshot.display().to_string(),
                    "users": users.len(),
                }),
                Err(e) => serde_json::json!({
                    "domain": domain.name,
                    "snapshot": domain.connection.snapshot.display().to_string(),
                    "error": e.to_string(),
                }),
            })
            .collect();
        println!(
            "{}",
            serde_json::json!({
                "event": "check",
                "ok": failures == 0,
                "mechanism": config.sync.mechanism.as_str(),
                "store": config.store_path().display().to_string(),
                "domains": entries,
                "excluded_usernames": config.exclusions.usernames,
                "excluded_groups": config.exclusions.groups,
            })
        );
    } else {
        println!("Mechanism: {}", config.sync.mechanism.as_str());
        println!("Store: {}", config.store_path().display());
        println!("Domains ({}):", domains.len());
        for (domain, listed) in &domains {
            match listed {
                Ok(users) => println!("  ✓ {} ({} users)", domain.name, users.len()),
                Err(e) => println!("  ✗ {}: {}", domain.name, e),
            }
        }
        if !config.exclusions.is_empty() {
            println!("Excluded usernames: {}", config.exclusions.usernames.join(", "));
            println!("Excluded groups: {}", config.exclusions.groups.join(", "));
        }
    }

    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}
