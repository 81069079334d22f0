//! Select the catalog subset matching boot-requirement flags.

use colored::Colorize;

use kext_graph::{filter_all, BundleCatalog, BundleRequirement, RequirementMask};

use crate::commands::describe;
use crate::error::{CliError, Result};

fn parse_flag(flag: &str) -> Result<BundleRequirement> {
    match flag {
        "root" => Ok(BundleRequirement::Root),
        "local-root" => Ok(BundleRequirement::LocalRoot),
        "network-root" => Ok(BundleRequirement::NetworkRoot),
        "safe-boot" => Ok(BundleRequirement::SafeBoot),
        "console" => Ok(BundleRequirement::Console),
        "driverkit" => Ok(BundleRequirement::DriverKit),
        other => Err(CliError::user(format!(
            "unknown requirement flag '{other}'. Valid: root, local-root, network-root, \
             safe-boot, console, driverkit"
        ))),
    }
}

pub fn run_filter(catalog: &BundleCatalog, flags: &[String], json: bool) -> Result<()> {
    let mut mask = RequirementMask::EMPTY;
    for flag in flags {
        mask = mask.with(parse_flag(flag)?);
    }

    let subset = filter_all(catalog, mask);

    if json {
        let entries: Vec<serde_json::Value> = subset
            .iter()
            .filter_map(|&idx| catalog.get(idx))
            .map(|d| {
                serde_json::json!({
                    "identifier": d.identifier,
                    "version": d.version.to_string(),
                    "requirement": d.requirement,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        println!("{} ({})", "Archive subset".bold(), flags.join(", "));
        if subset.is_empty() {
            println!("  (empty)");
        }
        for index in subset {
            println!("  {}", describe(catalog, index));
        }
    }
    Ok(())
}
