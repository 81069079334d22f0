//! Command implementations for kext-cli

pub mod deps;
pub mod filter;
pub mod list;
pub mod loadlist;
pub mod resolve;

pub use deps::run_deps;
pub use filter::run_filter;
pub use list::run_list;
pub use loadlist::run_loadlist;
pub use resolve::run_resolve;

use colored::Colorize;

use kext_graph::{BundleCatalog, BundleIndex, DependencyResolver, Error};

use crate::error::Result;

/// Look up a bundle by identifier, preferring the most recent version.
pub(crate) fn find_bundle(catalog: &BundleCatalog, identifier: &str) -> Result<BundleIndex> {
    catalog
        .all_with_identifier(identifier)
        .first()
        .copied()
        .ok_or_else(|| {
            Error::UnknownBundle {
                identifier: identifier.to_string(),
            }
            .into()
        })
}

/// Print every diagnostic the resolver accumulated, to stderr so stdout
/// stays scriptable.
pub(crate) fn print_diagnostics(resolver: &DependencyResolver) {
    for diagnostic in resolver.diagnostics().all() {
        eprintln!("{} {}", "diagnostic:".yellow().bold(), diagnostic);
    }
}

/// Render a bundle reference as `identifier (version)`.
pub(crate) fn describe(catalog: &BundleCatalog, index: BundleIndex) -> String {
    match catalog.get(index) {
        Some(d) => format!("{} ({})", d.identifier, d.version),
        None => format!("#{index:?}"),
    }
}
