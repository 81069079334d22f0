//! Dependency resolution and load-order planning for installable kernel
//! extension bundles.
//!
//! A [`BundleCatalog`] holds a snapshot of every known bundle descriptor.
//! The [`DependencyResolver`] picks a concrete provider for each declared
//! dependency (favoring bundles already active in the running system),
//! memoizing results until the catalog changes, and records failures as
//! [`Diagnostic`]s instead of aborting. [`plan_load_list`] turns resolved
//! graphs into deterministic, dependency-respecting activation orders, and
//! [`filter_all`]/[`filter_required`] assemble deployment subsets by
//! boot-stage requirement.
//!
//! Reading bundles from disk, executable linking, signing checks and the
//! actual load/unload of code are external collaborators; this crate works
//! purely on descriptors it is handed.

pub mod archive;
pub mod catalog;
pub mod descriptor;
pub mod diagnostics;
pub mod error;
pub mod planner;
pub mod resolver;
pub mod version;

pub use archive::{filter_all, filter_required};
pub use catalog::{BundleCatalog, BundleIndex};
pub use descriptor::{
    BundleDescriptor, BundleRequirement, DependencyRequirement, RequirementMask,
};
pub use diagnostics::{Diagnostic, DiagnosticsCollector, Phase, PhaseMask, Severity};
pub use error::{Error, Result};
pub use planner::{plan_load_list, plan_load_list_for, LoadList};
pub use resolver::{DependencyResolver, ResolvedDependencySet, ResolvedSlot};
pub use version::{Stage, Version};
