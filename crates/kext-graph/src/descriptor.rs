//! Bundle descriptors: the declared metadata of an installable extension
//! bundle, plus the boot-requirement flags used for archive filtering.

use serde::{Deserialize, Serialize};

use crate::version::Version;

/// A declared library dependency: an identifier plus an inclusive version
/// range the chosen provider must be compatible with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRequirement {
    pub identifier: String,
    pub min: Version,
    pub max: Version,
}

impl DependencyRequirement {
    pub fn new(identifier: impl Into<String>, min: Version, max: Version) -> Self {
        Self {
            identifier: identifier.into(),
            min,
            max,
        }
    }
}

/// Boot-stage requirement declared by a bundle, controlling which
/// deployment archives it is included in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BundleRequirement {
    None,
    Root,
    LocalRoot,
    NetworkRoot,
    SafeBoot,
    Console,
    DriverKit,
}

impl BundleRequirement {
    fn bit(self) -> u32 {
        match self {
            BundleRequirement::None => 0x0,
            BundleRequirement::Root => 0x1,
            BundleRequirement::LocalRoot => 0x1 << 1,
            BundleRequirement::NetworkRoot => 0x1 << 2,
            BundleRequirement::SafeBoot => 0x1 << 3,
            BundleRequirement::Console => 0x1 << 4,
            BundleRequirement::DriverKit => 0x1 << 5,
        }
    }
}

impl Default for BundleRequirement {
    fn default() -> Self {
        BundleRequirement::None
    }
}

/// A set of boot-stage requirements used to select catalog subsets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequirementMask(u32);

impl RequirementMask {
    pub const EMPTY: RequirementMask = RequirementMask(0);

    pub fn with(self, requirement: BundleRequirement) -> Self {
        RequirementMask(self.0 | requirement.bit())
    }

    /// Whether a bundle declaring `requirement` matches this mask.
    pub fn matches(self, requirement: BundleRequirement) -> bool {
        self.0 & requirement.bit() != 0
    }
}

impl FromIterator<BundleRequirement> for RequirementMask {
    fn from_iter<I: IntoIterator<Item = BundleRequirement>>(iter: I) -> Self {
        iter.into_iter()
            .fold(RequirementMask::EMPTY, RequirementMask::with)
    }
}

/// Declared metadata of one extension bundle.
///
/// The catalog owns descriptors; resolution never mutates declared fields.
/// The `active` flag is synchronized from the running system by the caller
/// and the `sequence` number is assigned by the catalog on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleDescriptor {
    /// Unique bundle identifier, case-sensitive, non-empty.
    pub identifier: String,
    pub version: Version,
    /// Oldest version this bundle remains link-compatible with. A bundle
    /// without a compatible floor is not linkable as a library.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatible_version: Option<Version>,
    /// Declared library dependencies, in declaration order.
    #[serde(default)]
    pub dependencies: Vec<DependencyRequirement>,
    #[serde(default)]
    pub has_executable: bool,
    /// An interface bundle carries no code and only re-exports symbols
    /// from its own dependencies.
    #[serde(default)]
    pub is_interface: bool,
    #[serde(default)]
    pub requirement: BundleRequirement,
    /// Whether this exact bundle is currently loaded in the running system.
    #[serde(default)]
    pub active: bool,
    /// Catalog-assigned creation sequence, used for deterministic
    /// tie-breaking. Zero until inserted.
    #[serde(skip)]
    pub(crate) sequence: u64,
}

impl BundleDescriptor {
    pub fn new(identifier: impl Into<String>, version: Version) -> Self {
        Self {
            identifier: identifier.into(),
            version,
            compatible_version: None,
            dependencies: Vec::new(),
            has_executable: false,
            is_interface: false,
            requirement: BundleRequirement::None,
            active: false,
            sequence: 0,
        }
    }

    /// Creation sequence number assigned by the catalog.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Whether this bundle can be linked against as a library: interface
    /// bundles always qualify as link-only targets, other bundles must
    /// declare an executable. A bundle without a compatible-version floor
    /// is further restricted to exact-version requests by
    /// [`Self::is_compatible_with`].
    pub fn is_library_eligible(&self) -> bool {
        self.is_interface || self.has_executable
    }

    /// Whether this bundle satisfies a request for its identifier at
    /// version `requested`: the request must fall inclusively between the
    /// compatible floor and the bundle's own version. Without a compatible
    /// floor only an exact-version request on an executable (or interface)
    /// bundle matches.
    pub fn is_compatible_with(&self, requested: Version) -> bool {
        if !requested.is_valid() || !self.version.is_valid() {
            return false;
        }
        match self.compatible_version {
            Some(floor) => requested.in_range(floor, self.version),
            None => requested == self.version && (self.has_executable || self.is_interface),
        }
    }

    /// Whether any version in the inclusive range `[min, max]` is
    /// satisfied by this bundle.
    pub fn satisfies_range(&self, min: Version, max: Version) -> bool {
        if !min.is_valid() || !max.is_valid() || min > max {
            return false;
        }
        match self.compatible_version {
            // Range intersection: [floor, version] must overlap [min, max].
            Some(floor) => floor <= max && min <= self.version,
            None => {
                self.version.in_range(min, max) && (self.has_executable || self.is_interface)
            }
        }
    }
}
