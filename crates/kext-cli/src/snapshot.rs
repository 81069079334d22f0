//! Catalog snapshot loading.
//!
//! The planner works on descriptors it is handed; reading real bundles
//! from disk belongs to an external loader. The CLI stands in for that
//! loader with a JSON snapshot listing every known descriptor, including
//! which ones the running system reports as active.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use kext_graph::{BundleCatalog, BundleDescriptor};

use crate::error::{CliError, Result};

/// On-disk form of a catalog: a flat list of bundle descriptors in
/// creation order.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub bundles: Vec<BundleDescriptor>,
}

impl CatalogSnapshot {
    /// Read and parse a snapshot file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|e| {
            CliError::user(format!("cannot read catalog {}: {e}", path.display()))
        })?;
        let snapshot: CatalogSnapshot = serde_json::from_str(&data)?;
        for bundle in &snapshot.bundles {
            if bundle.identifier.is_empty() {
                return Err(CliError::user("catalog contains a bundle with an empty identifier"));
            }
        }
        Ok(snapshot)
    }

    /// Build a catalog from the snapshot, preserving list order as
    /// creation order.
    pub fn into_catalog(self) -> BundleCatalog {
        let mut catalog = BundleCatalog::new();
        let count = self.bundles.len();
        for descriptor in self.bundles {
            catalog.insert(descriptor);
        }
        tracing::debug!(count, "catalog snapshot loaded");
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_snapshot_parses() {
        let json = r#"{
            "bundles": [
                {
                    "identifier": "com.example.lib",
                    "version": "1.2",
                    "compatible_version": "1.0",
                    "has_executable": true
                },
                {
                    "identifier": "com.example.top",
                    "version": "1.0",
                    "dependencies": [
                        {"identifier": "com.example.lib", "min": "1.0", "max": "2.0"}
                    ],
                    "has_executable": true,
                    "active": true
                }
            ]
        }"#;
        let snapshot: CatalogSnapshot = serde_json::from_str(json).unwrap();
        let catalog = snapshot.into_catalog();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.active_with_identifier("com.example.top").is_some());
    }

    #[test]
    fn test_malformed_version_rejected() {
        let json = r#"{"bundles": [{"identifier": "com.example.x", "version": "nope"}]}"#;
        let result: std::result::Result<CatalogSnapshot, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
