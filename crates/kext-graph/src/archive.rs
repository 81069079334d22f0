//! Boot-requirement filtering for deployment archives.
//!
//! Each bundle declares at most one boot-stage requirement; an archive is
//! assembled from every bundle whose requirement intersects the requested
//! mask. Pure functions of their inputs, no diagnostics.

use crate::catalog::{BundleCatalog, BundleIndex};
use crate::descriptor::RequirementMask;

/// Select the bundles among `indices` whose requirement matches `mask`,
/// preserving input order. Removed indices are skipped.
pub fn filter_required(
    catalog: &BundleCatalog,
    indices: &[BundleIndex],
    mask: RequirementMask,
) -> Vec<BundleIndex> {
    indices
        .iter()
        .copied()
        .filter(|&idx| {
            catalog
                .get(idx)
                .is_some_and(|d| mask.matches(d.requirement))
        })
        .collect()
}

/// Select every bundle in the catalog whose requirement matches `mask`,
/// in insertion order.
pub fn filter_all(catalog: &BundleCatalog, mask: RequirementMask) -> Vec<BundleIndex> {
    catalog
        .iter()
        .filter(|(_, d)| mask.matches(d.requirement))
        .map(|(idx, _)| idx)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{BundleDescriptor, BundleRequirement};
    use crate::version::Version;
    use pretty_assertions::assert_eq;

    fn required(id: &str, requirement: BundleRequirement) -> BundleDescriptor {
        let mut d = BundleDescriptor::new(id, Version::parse("1.0"));
        d.requirement = requirement;
        d
    }

    #[test]
    fn test_filter_all_by_single_flag() {
        let mut catalog = BundleCatalog::new();
        let safe = catalog.insert(required("com.example.safe", BundleRequirement::SafeBoot));
        catalog.insert(required("com.example.net", BundleRequirement::NetworkRoot));
        catalog.insert(required("com.example.none", BundleRequirement::None));

        let mask = RequirementMask::EMPTY.with(BundleRequirement::SafeBoot);
        assert_eq!(filter_all(&catalog, mask), vec![safe]);
    }

    #[test]
    fn test_filter_combined_mask() {
        let mut catalog = BundleCatalog::new();
        let root = catalog.insert(required("com.example.root", BundleRequirement::Root));
        let local = catalog.insert(required("com.example.local", BundleRequirement::LocalRoot));
        catalog.insert(required("com.example.dk", BundleRequirement::DriverKit));

        let mask: RequirementMask = [BundleRequirement::Root, BundleRequirement::LocalRoot]
            .into_iter()
            .collect();
        assert_eq!(filter_all(&catalog, mask), vec![root, local]);
    }

    #[test]
    fn test_filter_subset_preserves_input_order() {
        let mut catalog = BundleCatalog::new();
        let a = catalog.insert(required("com.example.a", BundleRequirement::Console));
        let b = catalog.insert(required("com.example.b", BundleRequirement::Console));
        let c = catalog.insert(required("com.example.c", BundleRequirement::SafeBoot));

        let mask = RequirementMask::EMPTY.with(BundleRequirement::Console);
        assert_eq!(filter_required(&catalog, &[b, c, a], mask), vec![b, a]);
    }

    #[test]
    fn test_filter_is_invariant_under_reordering_as_a_set() {
        let mut catalog = BundleCatalog::new();
        let a = catalog.insert(required("com.example.a", BundleRequirement::SafeBoot));
        let b = catalog.insert(required("com.example.b", BundleRequirement::SafeBoot));
        let c = catalog.insert(required("com.example.c", BundleRequirement::Root));

        let mask = RequirementMask::EMPTY.with(BundleRequirement::SafeBoot);
        let mut forward = filter_required(&catalog, &[a, b, c], mask);
        let mut backward = filter_required(&catalog, &[c, b, a], mask);
        forward.sort();
        backward.sort();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_none_requirement_never_matches() {
        let mut catalog = BundleCatalog::new();
        catalog.insert(required("com.example.none", BundleRequirement::None));

        let mask: RequirementMask = [
            BundleRequirement::Root,
            BundleRequirement::LocalRoot,
            BundleRequirement::NetworkRoot,
            BundleRequirement::SafeBoot,
            BundleRequirement::Console,
            BundleRequirement::DriverKit,
        ]
        .into_iter()
        .collect();
        assert!(filter_all(&catalog, mask).is_empty());
    }
}
