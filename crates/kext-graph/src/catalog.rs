//! The bundle catalog: a snapshot of all known bundle descriptors.
//!
//! Descriptors live in an arena and are addressed by stable
//! [`BundleIndex`] handles. Every mutation (insert, remove, active-flag
//! change) bumps a generation counter; memoized resolution results carry
//! the generation they were computed against and are recomputed when
//! stale, so no resolution result from a pre-mutation snapshot can be
//! observed afterwards.

use std::collections::HashMap;

use crate::descriptor::BundleDescriptor;
use crate::version::Version;

/// Stable handle to a descriptor in a [`BundleCatalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BundleIndex(pub(crate) usize);

/// Snapshot of all known bundle descriptors, indexed by identifier.
#[derive(Debug, Default)]
pub struct BundleCatalog {
    // Arena slots; removal leaves a tombstone so indices stay stable.
    slots: Vec<Option<BundleDescriptor>>,
    by_identifier: HashMap<String, Vec<BundleIndex>>,
    next_sequence: u64,
    generation: u64,
}

impl BundleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mutation generation. Bumped by insert, remove and
    /// set_active.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Insert a descriptor, assigning it the next creation sequence
    /// number. Multiple descriptors may share an identifier (distinct
    /// versions, or even duplicates distinguished only by sequence).
    pub fn insert(&mut self, mut descriptor: BundleDescriptor) -> BundleIndex {
        self.next_sequence += 1;
        descriptor.sequence = self.next_sequence;
        let identifier = descriptor.identifier.clone();
        let active = descriptor.active;

        let index = BundleIndex(self.slots.len());
        self.slots.push(Some(descriptor));
        self.by_identifier.entry(identifier).or_default().push(index);
        self.generation += 1;

        if active {
            // Re-assert the one-active-per-identifier invariant.
            self.set_active(index, true);
        }
        tracing::debug!(index = index.0, "inserted bundle");
        index
    }

    /// Remove the descriptor with the given identifier and exact version.
    /// Returns whether anything was removed.
    pub fn remove(&mut self, identifier: &str, version: Version) -> bool {
        let slots = &self.slots;
        let Some(indices) = self.by_identifier.get_mut(identifier) else {
            return false;
        };
        let Some(pos) = indices
            .iter()
            .position(|&idx| slots[idx.0].as_ref().is_some_and(|d| d.version == version))
        else {
            return false;
        };
        let index = indices.remove(pos);
        if indices.is_empty() {
            self.by_identifier.remove(identifier);
        }
        self.slots[index.0] = None;
        self.generation += 1;
        tracing::debug!(identifier, %version, "removed bundle");
        true
    }

    /// Look up a descriptor by index. `None` for removed slots.
    pub fn get(&self, index: BundleIndex) -> Option<&BundleDescriptor> {
        self.slots.get(index.0).and_then(Option::as_ref)
    }

    /// All live descriptors for an identifier, ordered by version
    /// descending, then by creation sequence descending: most recent
    /// version first, most recently created first among equals.
    pub fn all_with_identifier(&self, identifier: &str) -> Vec<BundleIndex> {
        let mut live: Vec<(Version, u64, BundleIndex)> = self
            .by_identifier
            .get(identifier)
            .map(|v| {
                v.iter()
                    .filter_map(|&idx| {
                        self.slots[idx.0]
                            .as_ref()
                            .map(|d| (d.version, d.sequence, idx))
                    })
                    .collect()
            })
            .unwrap_or_default();
        live.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));
        live.into_iter().map(|(_, _, idx)| idx).collect()
    }

    /// The descriptor with identifier and exact version, preferring the
    /// most recently created when duplicates exist.
    pub fn with_identifier_and_version(
        &self,
        identifier: &str,
        version: Version,
    ) -> Option<BundleIndex> {
        self.all_with_identifier(identifier)
            .into_iter()
            .find(|&idx| self.slots[idx.0].as_ref().is_some_and(|d| d.version == version))
    }

    /// The currently active descriptor for an identifier, if any.
    ///
    /// At most one descriptor per identifier may be active; a second
    /// active sibling indicates a catalog mutation outside `set_active`
    /// and is a programming error.
    pub fn active_with_identifier(&self, identifier: &str) -> Option<BundleIndex> {
        let active: Vec<BundleIndex> = self
            .by_identifier
            .get(identifier)?
            .iter()
            .copied()
            .filter(|idx| self.slots[idx.0].as_ref().is_some_and(|d| d.active))
            .collect();
        debug_assert!(
            active.len() <= 1,
            "multiple active bundles for identifier {identifier}"
        );
        active.first().copied()
    }

    /// Set or clear the active flag. Setting it clears the flag on every
    /// other descriptor with the same identifier: only one version of a
    /// given extension can be running.
    pub fn set_active(&mut self, index: BundleIndex, active: bool) {
        let Some(identifier) = self.get(index).map(|d| d.identifier.clone()) else {
            return;
        };
        if active {
            let siblings: Vec<BundleIndex> = self
                .by_identifier
                .get(&identifier)
                .cloned()
                .unwrap_or_default();
            for sibling in siblings {
                if sibling != index {
                    if let Some(d) = self.slots[sibling.0].as_mut() {
                        d.active = false;
                    }
                }
            }
        }
        if let Some(d) = self.slots[index.0].as_mut() {
            d.active = active;
        }
        self.generation += 1;
        tracing::debug!(%identifier, active, "active flag changed");
    }

    /// Iterate over all live bundles in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (BundleIndex, &BundleDescriptor)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|d| (BundleIndex(i), d)))
    }

    /// Number of live bundles.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
