//! Resolve one bundle and show the outcome of every dependency slot.

use colored::Colorize;

use kext_graph::{BundleCatalog, DependencyResolver, ResolvedSlot};

use crate::commands::{describe, find_bundle, print_diagnostics};
use crate::error::Result;

pub fn run_resolve(catalog: &BundleCatalog, identifier: &str, json: bool) -> Result<()> {
    let index = find_bundle(catalog, identifier)?;
    let mut resolver = DependencyResolver::new();
    let set = resolver.resolve(catalog, index).clone();

    let declared: Vec<_> = catalog
        .get(index)
        .map(|d| d.dependencies.clone())
        .unwrap_or_default();

    if json {
        let slots: Vec<serde_json::Value> = declared
            .iter()
            .zip(set.slots())
            .map(|(requirement, slot)| match slot {
                ResolvedSlot::Resolved(provider) => serde_json::json!({
                    "requirement": requirement,
                    "resolved": catalog.get(*provider).map(|d| d.identifier.clone()),
                }),
                ResolvedSlot::Unresolved => serde_json::json!({
                    "requirement": requirement,
                    "resolved": null,
                }),
            })
            .collect();
        let output = serde_json::json!({
            "identifier": identifier,
            "complete": set.is_complete(),
            "slots": slots,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{} {}", "Resolution for".bold(), describe(catalog, index));
        for (requirement, slot) in declared.iter().zip(set.slots()) {
            match slot {
                ResolvedSlot::Resolved(provider) => println!(
                    "  {} {} [{}, {}] -> {}",
                    "ok".green(),
                    requirement.identifier,
                    requirement.min,
                    requirement.max,
                    describe(catalog, *provider)
                ),
                ResolvedSlot::Unresolved => println!(
                    "  {} {} [{}, {}]",
                    "unresolved".red(),
                    requirement.identifier,
                    requirement.min,
                    requirement.max
                ),
            }
        }
        if set.slots().is_empty() {
            println!("  (no declared dependencies)");
        }
    }

    print_diagnostics(&resolver);
    Ok(())
}
