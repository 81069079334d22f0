//! Dependency resolution: picking a concrete provider bundle for every
//! declared dependency of a bundle.
//!
//! Resolution is memoized per bundle against the catalog generation it ran
//! under; any catalog mutation makes memoized sets stale and they are
//! recomputed transparently on the next request. `resolve` never fails
//! outright: slots that cannot be satisfied are left unresolved with a
//! dependency-phase diagnostic and the remaining slots still resolve.
//!
//! Candidate priority per slot: the currently active bundle for the
//! identifier wins unconditionally when it satisfies the range (loaded
//! state beats version recency); otherwise the highest version wins, ties
//! broken by highest creation sequence.

use std::collections::{HashMap, HashSet};

use crate::catalog::{BundleCatalog, BundleIndex};
use crate::descriptor::DependencyRequirement;
use crate::diagnostics::{DiagnosticsCollector, Phase, Severity};
use crate::error::{Error, Result};

/// One resolved dependency slot, parallel to the descriptor's declared
/// dependency at the same position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedSlot {
    Resolved(BundleIndex),
    Unresolved,
}

/// The resolved dependencies of one bundle, one slot per declared
/// dependency in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependencySet {
    generation: u64,
    slots: Vec<ResolvedSlot>,
}

impl ResolvedDependencySet {
    /// Catalog generation this set was computed against.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn slots(&self) -> &[ResolvedSlot] {
        &self.slots
    }

    /// Whether every declared dependency resolved to a provider.
    pub fn is_complete(&self) -> bool {
        self.slots
            .iter()
            .all(|s| matches!(s, ResolvedSlot::Resolved(_)))
    }

    /// Resolved providers in declaration order, unresolved slots skipped.
    pub fn resolved(&self) -> impl Iterator<Item = BundleIndex> + '_ {
        self.slots.iter().filter_map(|s| match s {
            ResolvedSlot::Resolved(idx) => Some(*idx),
            ResolvedSlot::Unresolved => None,
        })
    }
}

/// Memoizing dependency resolver over a [`BundleCatalog`].
#[derive(Debug, Default)]
pub struct DependencyResolver {
    cache: HashMap<BundleIndex, ResolvedDependencySet>,
    in_flight: HashSet<BundleIndex>,
    diagnostics: DiagnosticsCollector,
}

impl DependencyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diagnostics accumulated by resolution so far.
    pub fn diagnostics(&self) -> &DiagnosticsCollector {
        &self.diagnostics
    }

    /// Mutable access for flushing accumulated diagnostics.
    pub fn diagnostics_mut(&mut self) -> &mut DiagnosticsCollector {
        &mut self.diagnostics
    }

    /// Drop memoized resolution results for one bundle, or for every
    /// bundle when `bundle` is `None`. Catalog mutations already
    /// invalidate memoized sets via the generation counter; this is for
    /// callers that want eager recomputation.
    pub fn flush(&mut self, bundle: Option<BundleIndex>) {
        match bundle {
            Some(index) => {
                self.cache.remove(&index);
            }
            None => self.cache.clear(),
        }
    }

    /// Resolve every declared dependency of `index`, memoized.
    ///
    /// A fresh (same-generation) memoized set is returned unchanged
    /// without recomputation. Chosen providers are themselves resolved
    /// recursively so closure queries never re-walk the catalog. Never
    /// fails: callers distinguish success from partial failure with
    /// [`ResolvedDependencySet::is_complete`].
    pub fn resolve(&mut self, catalog: &BundleCatalog, index: BundleIndex) -> &ResolvedDependencySet {
        self.ensure_resolved(catalog, index);
        self.cache
            .entry(index)
            .or_insert_with(|| ResolvedDependencySet {
                generation: catalog.generation(),
                slots: Vec::new(),
            })
    }

    fn ensure_resolved(&mut self, catalog: &BundleCatalog, index: BundleIndex) {
        // Re-entrant request for a bundle currently being resolved: the
        // edge is already recorded; the planner reports the cycle.
        if self.in_flight.contains(&index) {
            return;
        }
        if let Some(existing) = self.cache.get(&index) {
            if existing.generation == catalog.generation() {
                return;
            }
        }

        let Some(descriptor) = catalog.get(index) else {
            // Removed bundle; nothing to resolve.
            self.cache.insert(
                index,
                ResolvedDependencySet {
                    generation: catalog.generation(),
                    slots: Vec::new(),
                },
            );
            return;
        };

        let identifier = descriptor.identifier.clone();
        tracing::debug!(%identifier, version = %descriptor.version, "resolving dependencies");

        self.in_flight.insert(index);
        let mut slots = Vec::with_capacity(descriptor.dependencies.len());
        let mut chosen = Vec::new();

        for requirement in &descriptor.dependencies {
            match self.choose_candidate(catalog, requirement) {
                Some(provider) => {
                    slots.push(ResolvedSlot::Resolved(provider));
                    chosen.push(provider);
                }
                None => {
                    self.diagnostics.report(
                        identifier.clone(),
                        Phase::Dependency,
                        Severity::Error,
                        format!(
                            "unresolved dependency: {} in [{}, {}]",
                            requirement.identifier, requirement.min, requirement.max
                        ),
                    );
                    slots.push(ResolvedSlot::Unresolved);
                }
            }
        }

        self.cache.insert(
            index,
            ResolvedDependencySet {
                generation: catalog.generation(),
                slots,
            },
        );

        // Resolve chosen providers before reporting this bundle done, so
        // closure queries can walk memoized sets only.
        for provider in chosen {
            self.ensure_resolved(catalog, provider);
        }
        self.in_flight.remove(&index);
    }

    /// Pick the provider for one declared dependency, or `None` when no
    /// candidate satisfies it.
    fn choose_candidate(
        &self,
        catalog: &BundleCatalog,
        requirement: &DependencyRequirement,
    ) -> Option<BundleIndex> {
        let candidates: Vec<BundleIndex> = catalog
            .all_with_identifier(&requirement.identifier)
            .into_iter()
            .filter(|&idx| {
                catalog.get(idx).is_some_and(|d| {
                    d.is_library_eligible() && d.satisfies_range(requirement.min, requirement.max)
                })
            })
            .collect();

        // Loaded state wins over version recency.
        if let Some(active) = catalog.active_with_identifier(&requirement.identifier) {
            if candidates.contains(&active) {
                return Some(active);
            }
        }

        // Candidates are already ordered by version descending then
        // sequence descending.
        candidates.first().copied()
    }

    /// Direct declared dependencies, resolved. With `need_all`, any
    /// unresolved slot makes the whole query unavailable.
    pub fn declared_dependencies(
        &mut self,
        catalog: &BundleCatalog,
        index: BundleIndex,
        need_all: bool,
    ) -> Result<Vec<BundleIndex>> {
        let set = self.resolve(catalog, index);
        if need_all && !set.is_complete() {
            return Err(incomplete(catalog, index));
        }
        let mut out = Vec::new();
        for provider in set.resolved() {
            if !out.contains(&provider) {
                out.push(provider);
            }
        }
        Ok(out)
    }

    /// Direct link dependencies: declared dependencies with interface
    /// bundles replaced, recursively, by their own resolved non-interface
    /// providers.
    pub fn link_dependencies(
        &mut self,
        catalog: &BundleCatalog,
        index: BundleIndex,
        need_all: bool,
    ) -> Result<Vec<BundleIndex>> {
        let direct = self.declared_dependencies(catalog, index, need_all)?;
        let mut out = Vec::new();
        let mut expanding = HashSet::new();
        for provider in direct {
            self.expand_link(catalog, provider, need_all, &mut out, &mut expanding)?;
        }
        Ok(out)
    }

    fn expand_link(
        &mut self,
        catalog: &BundleCatalog,
        index: BundleIndex,
        need_all: bool,
        out: &mut Vec<BundleIndex>,
        expanding: &mut HashSet<BundleIndex>,
    ) -> Result<()> {
        let is_interface = catalog.get(index).is_some_and(|d| d.is_interface);
        if !is_interface {
            if !out.contains(&index) {
                out.push(index);
            }
            return Ok(());
        }
        if !expanding.insert(index) {
            return Ok(());
        }
        let providers = self.declared_dependencies(catalog, index, need_all)?;
        for provider in providers {
            self.expand_link(catalog, provider, need_all, out, expanding)?;
        }
        expanding.remove(&index);
        Ok(())
    }

    /// Full transitive dependency closure, root excluded, in depth-first
    /// declaration order.
    pub fn all_dependencies(
        &mut self,
        catalog: &BundleCatalog,
        index: BundleIndex,
        need_all: bool,
    ) -> Result<Vec<BundleIndex>> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        seen.insert(index);
        self.collect_closure(catalog, index, need_all, &mut out, &mut seen)?;
        Ok(out)
    }

    fn collect_closure(
        &mut self,
        catalog: &BundleCatalog,
        index: BundleIndex,
        need_all: bool,
        out: &mut Vec<BundleIndex>,
        seen: &mut HashSet<BundleIndex>,
    ) -> Result<()> {
        let direct = self.declared_dependencies(catalog, index, need_all)?;
        for provider in direct {
            if seen.insert(provider) {
                out.push(provider);
                self.collect_closure(catalog, provider, need_all, out, seen)?;
            }
        }
        Ok(())
    }

    /// Transitive closure minus the direct dependencies.
    pub fn indirect_dependencies(
        &mut self,
        catalog: &BundleCatalog,
        index: BundleIndex,
        need_all: bool,
    ) -> Result<Vec<BundleIndex>> {
        let all = self.all_dependencies(catalog, index, need_all)?;
        let direct = self.declared_dependencies(catalog, index, need_all)?;
        Ok(all.into_iter().filter(|idx| !direct.contains(idx)).collect())
    }
}

fn incomplete(catalog: &BundleCatalog, index: BundleIndex) -> Error {
    Error::IncompleteClosure {
        identifier: catalog
            .get(index)
            .map(|d| d.identifier.clone())
            .unwrap_or_else(|| format!("#{}", index.0)),
    }
}
