//! Plan a load order for the requested root bundles.

use colored::Colorize;

use kext_graph::{plan_load_list, BundleCatalog, DependencyResolver};

use crate::commands::{describe, find_bundle, print_diagnostics};
use crate::error::Result;

pub fn run_loadlist(
    catalog: &BundleCatalog,
    identifiers: &[String],
    need_all: bool,
    json: bool,
) -> Result<()> {
    let mut roots = Vec::with_capacity(identifiers.len());
    for identifier in identifiers {
        roots.push(find_bundle(catalog, identifier)?);
    }

    let mut resolver = DependencyResolver::new();
    let list = plan_load_list(catalog, &mut resolver, &roots, need_all)?;

    if json {
        let entries: Vec<serde_json::Value> = list
            .iter()
            .filter_map(|&idx| catalog.get(idx))
            .map(|d| {
                serde_json::json!({
                    "identifier": d.identifier,
                    "version": d.version.to_string(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        println!("{}", "Load order".bold());
        for (position, &index) in list.iter().enumerate() {
            println!("  {:>3}. {}", position + 1, describe(catalog, index));
        }
    }

    print_diagnostics(&resolver);
    Ok(())
}
