//! Load-order planning: turning resolved dependency graphs into a
//! deterministic, dependency-respecting activation sequence.
//!
//! The planner walks each root's resolved dependencies depth-first in
//! declaration order and emits bundles post-order, so every bundle's
//! dependencies appear before it and no bundle appears twice. A root whose
//! closure contains a cycle contributes nothing: the cycle is recorded as
//! a dependency-phase diagnostic and planning continues with the remaining
//! roots.

use std::collections::HashSet;

use crate::catalog::{BundleCatalog, BundleIndex};
use crate::diagnostics::{Phase, Severity};
use crate::error::{Error, Result};
use crate::resolver::DependencyResolver;

/// Dependency-respecting activation order: every entry's dependencies
/// appear at earlier positions, and no entry repeats.
pub type LoadList = Vec<BundleIndex>;

/// Plan the load order for `roots` and their transitive dependencies.
///
/// Roots are processed in the given order and dependencies in declaration
/// order, so the result is deterministic for a fixed catalog snapshot and
/// root ordering. With `need_all`, an unresolved dependency slot anywhere
/// in the visited closure makes the whole call fail with
/// [`Error::IncompleteClosure`]; without it, unresolved slots are simply
/// omitted from the ordering.
pub fn plan_load_list(
    catalog: &BundleCatalog,
    resolver: &mut DependencyResolver,
    roots: &[BundleIndex],
    need_all: bool,
) -> Result<LoadList> {
    let mut load_list = Vec::new();
    let mut emitted = HashSet::new();

    for &root in roots {
        let mut pending = Vec::new();
        let mut visiting = Vec::new();
        match visit(
            catalog,
            resolver,
            root,
            need_all,
            &emitted,
            &mut pending,
            &mut visiting,
        ) {
            Ok(()) => {
                for index in pending {
                    emitted.insert(index);
                    load_list.push(index);
                }
            }
            Err(Error::DependencyCycle { participants }) => {
                let identifier = catalog
                    .get(root)
                    .map(|d| d.identifier.clone())
                    .unwrap_or_else(|| format!("#{}", root.0));
                tracing::warn!(%identifier, "load list dropped root with cyclic dependencies");
                resolver.diagnostics_mut().report(
                    identifier,
                    Phase::Dependency,
                    Severity::Error,
                    format!("cyclic dependency involving: {}", participants.join(", ")),
                );
            }
            Err(other) => return Err(other),
        }
    }

    Ok(load_list)
}

/// Convenience wrapper for a single root.
pub fn plan_load_list_for(
    catalog: &BundleCatalog,
    resolver: &mut DependencyResolver,
    root: BundleIndex,
    need_all: bool,
) -> Result<LoadList> {
    plan_load_list(catalog, resolver, &[root], need_all)
}

fn visit(
    catalog: &BundleCatalog,
    resolver: &mut DependencyResolver,
    index: BundleIndex,
    need_all: bool,
    emitted: &HashSet<BundleIndex>,
    pending: &mut Vec<BundleIndex>,
    visiting: &mut Vec<BundleIndex>,
) -> Result<()> {
    if emitted.contains(&index) || pending.contains(&index) {
        return Ok(());
    }
    if let Some(cycle_start) = visiting.iter().position(|&v| v == index) {
        let participants = visiting[cycle_start..]
            .iter()
            .map(|&idx| {
                catalog
                    .get(idx)
                    .map(|d| d.identifier.clone())
                    .unwrap_or_else(|| format!("#{}", idx.0))
            })
            .collect();
        return Err(Error::DependencyCycle { participants });
    }

    visiting.push(index);
    let set = resolver.resolve(catalog, index).clone();
    if need_all && !set.is_complete() {
        let identifier = catalog
            .get(index)
            .map(|d| d.identifier.clone())
            .unwrap_or_else(|| format!("#{}", index.0));
        return Err(Error::IncompleteClosure { identifier });
    }
    for dependency in set.resolved() {
        visit(catalog, resolver, dependency, need_all, emitted, pending, visiting)?;
    }
    visiting.pop();

    // Post-order emission: dependencies are already in the list.
    pending.push(index);
    Ok(())
}
