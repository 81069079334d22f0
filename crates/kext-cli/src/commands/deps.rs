//! Show a bundle's declared, link, transitive, or indirect dependencies.

use colored::Colorize;

use kext_graph::{BundleCatalog, DependencyResolver};

use crate::cli::DepsKind;
use crate::commands::{describe, find_bundle, print_diagnostics};
use crate::error::Result;

pub fn run_deps(
    catalog: &BundleCatalog,
    identifier: &str,
    kind: DepsKind,
    need_all: bool,
    json: bool,
) -> Result<()> {
    let index = find_bundle(catalog, identifier)?;
    let mut resolver = DependencyResolver::new();

    let dependencies = match kind {
        DepsKind::Declared => resolver.declared_dependencies(catalog, index, need_all),
        DepsKind::Link => resolver.link_dependencies(catalog, index, need_all),
        DepsKind::All => resolver.all_dependencies(catalog, index, need_all),
        DepsKind::Indirect => resolver.indirect_dependencies(catalog, index, need_all),
    }?;

    if json {
        let entries: Vec<serde_json::Value> = dependencies
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
        println!(
            "{} {} ({:?})",
            "Dependencies of".bold(),
            describe(catalog, index),
            kind
        );
        if dependencies.is_empty() {
            println!("  (none)");
        }
        for dependency in dependencies {
            println!("  {}", describe(catalog, dependency));
        }
    }

    print_diagnostics(&resolver);
    Ok(())
}
