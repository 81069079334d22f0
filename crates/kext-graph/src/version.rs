//! Kext bundle version parsing and ordering.
//!
//! Bundle versions are dotted strings with up to four numeric components
//! (`major.minor.revision.build`) and an optional release-stage suffix on
//! the last component: `d` (development), `a` (alpha), `b` (beta) or `fc`
//! (release candidate) followed by a stage level, e.g. `1.2.0b5`. A version
//! with no stage suffix is a final release and orders above every staged
//! build of the same numeric version.
//!
//! Parsing is total: malformed input yields [`Version::INVALID`], which
//! orders below every valid version and never satisfies a range.
//!
//! # Examples
//!
//! ```
//! use kext_graph::Version;
//!
//! let a = Version::parse("1.2");
//! let b = Version::parse("1.2.0");
//! assert_eq!(a, b);
//!
//! let beta = Version::parse("2.0b3");
//! let release = Version::parse("2.0");
//! assert!(beta < release);
//!
//! assert!(!Version::parse("garbage").is_valid());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Maximum number of dotted numeric components in a version string.
const MAX_COMPONENTS: usize = 4;

/// Release stage of a version. Final releases order above every
/// pre-release stage of the same numeric version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Development,
    Alpha,
    Beta,
    Candidate,
    Release,
}

impl Stage {
    fn suffix(self) -> &'static str {
        match self {
            Stage::Development => "d",
            Stage::Alpha => "a",
            Stage::Beta => "b",
            Stage::Candidate => "fc",
            Stage::Release => "",
        }
    }
}

/// A parsed, totally ordered bundle version.
///
/// Construct via [`Version::parse`] (total, never fails) or [`FromStr`].
/// Ordering compares numeric components lexicographically by position with
/// absent trailing components treated as zero, then stage, then stage level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    valid: bool,
    components: [u32; MAX_COMPONENTS],
    stage: Stage,
    stage_level: u32,
}

impl Version {
    /// Sentinel for unparseable version strings. Orders below every valid
    /// version and never satisfies any range.
    pub const INVALID: Version = Version {
        valid: false,
        components: [0; MAX_COMPONENTS],
        stage: Stage::Development,
        stage_level: 0,
    };

    /// Build a valid release version from explicit numeric components.
    pub fn new(major: u32, minor: u32, revision: u32) -> Self {
        Version {
            valid: true,
            components: [major, minor, revision, 0],
            stage: Stage::Release,
            stage_level: 0,
        }
    }

    /// Parse a version string. Never fails: malformed input yields
    /// [`Version::INVALID`].
    pub fn parse(s: &str) -> Self {
        parse_version(s.trim()).unwrap_or(Version::INVALID)
    }

    /// Whether this is a real parsed version rather than the invalid
    /// sentinel.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Inclusive range check. An empty range (`min > max`) is never
    /// satisfied, and the invalid sentinel satisfies nothing.
    pub fn in_range(&self, min: Version, max: Version) -> bool {
        if !self.valid || !min.is_valid() || !max.is_valid() || min > max {
            return false;
        }
        min <= *self && *self <= max
    }
}

impl Default for Version {
    fn default() -> Self {
        Version::INVALID
    }
}

impl FromStr for Version {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Version::parse(s))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.valid {
            return f.write_str("(invalid)");
        }
        // Canonical form: trailing zero components are elided down to
        // major.minor.
        let mut last = MAX_COMPONENTS;
        while last > 2 && self.components[last - 1] == 0 {
            last -= 1;
        }
        let dotted: Vec<String> = self.components[..last]
            .iter()
            .map(|c| c.to_string())
            .collect();
        write!(f, "{}", dotted.join("."))?;
        if self.stage != Stage::Release {
            write!(f, "{}{}", self.stage.suffix(), self.stage_level)?;
        }
        Ok(())
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let version = Version::parse(&s);
        if !version.is_valid() {
            return Err(D::Error::custom(format!("invalid version string '{s}'")));
        }
        Ok(version)
    }
}

/// Parse the stage suffix and level from the tail of a component,
/// e.g. `"0b5"` -> (`0`, Beta, 5).
fn split_stage(component: &str) -> Option<(&str, Stage, u32)> {
    let idx = component.find(|c: char| !c.is_ascii_digit())?;
    let (digits, suffix) = component.split_at(idx);
    let (stage, level_str) = if let Some(rest) = suffix.strip_prefix("fc") {
        (Stage::Candidate, rest)
    } else if let Some(rest) = suffix.strip_prefix('d') {
        (Stage::Development, rest)
    } else if let Some(rest) = suffix.strip_prefix('a') {
        (Stage::Alpha, rest)
    } else if let Some(rest) = suffix.strip_prefix('b') {
        (Stage::Beta, rest)
    } else {
        return None;
    };
    let level: u32 = level_str.parse().ok()?;
    Some((digits, stage, level))
}

fn parse_version(s: &str) -> Option<Version> {
    if s.is_empty() {
        return None;
    }

    let mut components = [0u32; MAX_COMPONENTS];
    let mut stage = Stage::Release;
    let mut stage_level = 0u32;

    let parts: Vec<&str> = s.split('.').collect();
    if parts.len() > MAX_COMPONENTS {
        return None;
    }

    let last = parts.len() - 1;
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            return None;
        }
        let digits = if i == last {
            match split_stage(part) {
                Some((digits, s, level)) => {
                    stage = s;
                    stage_level = level;
                    digits
                }
                None if part.chars().all(|c| c.is_ascii_digit()) => part,
                None => return None,
            }
        } else {
            part
        };
        if digits.is_empty() {
            return None;
        }
        components[i] = digits.parse().ok()?;
    }

    Some(Version {
        valid: true,
        components,
        stage,
        stage_level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_basic() {
        let v = Version::parse("1.2.3");
        assert!(v.is_valid());
        assert_eq!(v, Version::new(1, 2, 3));
    }

    #[test]
    fn test_trailing_zeros_equal() {
        assert_eq!(Version::parse("1.2"), Version::parse("1.2.0"));
        assert_eq!(Version::parse("1.2"), Version::parse("1.2.0.0"));
        assert_eq!(Version::parse("1"), Version::parse("1.0.0.0"));
    }

    #[test]
    fn test_numeric_ordering() {
        assert!(Version::parse("1.2.3") < Version::parse("1.2.4"));
        assert!(Version::parse("1.10") > Version::parse("1.9"));
        assert!(Version::parse("2.0") > Version::parse("1.99.99.99"));
    }

    #[test]
    fn test_stage_ordering() {
        assert!(Version::parse("1.0d1") < Version::parse("1.0a1"));
        assert!(Version::parse("1.0a1") < Version::parse("1.0b1"));
        assert!(Version::parse("1.0b9") < Version::parse("1.0fc1"));
        assert!(Version::parse("1.0fc2") < Version::parse("1.0"));
        assert!(Version::parse("1.0b1") < Version::parse("1.0b2"));
    }

    #[test]
    fn test_stage_on_deep_component() {
        let v = Version::parse("1.2.3.4fc2");
        assert!(v.is_valid());
        assert!(v < Version::parse("1.2.3.4"));
        assert!(v > Version::parse("1.2.3.4b9"));
    }

    #[test]
    fn test_invalid_inputs() {
        for bad in ["", "garbage", "1.2.3.4.5", "1..2", "1.x", "1.2b", "b2", "-1.0"] {
            assert!(!Version::parse(bad).is_valid(), "{bad:?} should be invalid");
        }
    }

    #[test]
    fn test_invalid_orders_below_everything() {
        assert!(Version::INVALID < Version::parse("0"));
        assert!(Version::INVALID < Version::parse("0.0d1"));
    }

    #[test]
    fn test_in_range_inclusive() {
        let v = Version::parse("1.5");
        assert!(v.in_range(Version::parse("1.5"), Version::parse("1.5")));
        assert!(v.in_range(Version::parse("1.0"), Version::parse("2.0")));
        assert!(!v.in_range(Version::parse("1.6"), Version::parse("2.0")));
    }

    #[test]
    fn test_empty_range_never_satisfied() {
        let v = Version::parse("1.5");
        assert!(!v.in_range(Version::parse("2.0"), Version::parse("1.0")));
    }

    #[test]
    fn test_invalid_never_satisfies() {
        assert!(!Version::INVALID.in_range(Version::parse("0"), Version::parse("99")));
    }

    #[test]
    fn test_display_roundtrip() {
        for s in ["1.2", "1.2.3", "1.2.3.4", "2.0b5", "10.0.1fc1"] {
            let v = Version::parse(s);
            assert_eq!(Version::parse(&v.to_string()), v);
        }
    }

    #[test]
    fn test_display_canonical() {
        assert_eq!(Version::parse("1.2.0").to_string(), "1.2");
        assert_eq!(Version::parse("1.0.0.0").to_string(), "1.0");
        assert_eq!(Version::parse("1.2.3b4").to_string(), "1.2.3b4");
    }

    #[test]
    fn test_serde_as_string() {
        let v = Version::parse("1.2.3b4");
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "\"1.2.3b4\"");
        let back: Version = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn test_serde_rejects_malformed() {
        let result: Result<Version, _> = serde_json::from_str("\"not-a-version\"");
        assert!(result.is_err());
    }
}
