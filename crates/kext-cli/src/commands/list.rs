//! List every bundle in the catalog.

use colored::Colorize;

use kext_graph::BundleCatalog;

use crate::error::Result;

pub fn run_list(catalog: &BundleCatalog, json: bool) -> Result<()> {
    if json {
        let entries: Vec<serde_json::Value> = catalog
            .iter()
            .map(|(_, d)| {
                serde_json::json!({
                    "identifier": d.identifier,
                    "version": d.version.to_string(),
                    "active": d.active,
                    "interface": d.is_interface,
                    "dependencies": d.dependencies.len(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("{}", "Catalog".bold());
    for (_, descriptor) in catalog.iter() {
        let mut tags = Vec::new();
        if descriptor.active {
            tags.push("active".green().to_string());
        }
        if descriptor.is_interface {
            tags.push("interface".cyan().to_string());
        }
        let suffix = if tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", tags.join(", "))
        };
        println!(
            "  {:<40} {}{}",
            descriptor.identifier, descriptor.version, suffix
        );
    }
    println!("{} bundles", catalog.len());
    Ok(())
}
