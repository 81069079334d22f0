//! Accumulated per-bundle diagnostics.
//!
//! Batch operations over many bundles must report everything they find
//! rather than aborting on the first problem, so failures are recorded
//! here as structured entries and read back after the batch completes.
//! Entries accumulate until explicitly flushed; reading never mutates.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Resolution phase a diagnostic was recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Validation,
    Authentication,
    Dependency,
    BootLevel,
    Warning,
}

impl Phase {
    fn bit(self) -> u32 {
        match self {
            Phase::Validation => 0x1,
            Phase::Authentication => 0x2,
            Phase::Dependency => 0x4,
            Phase::BootLevel => 0x8,
            Phase::Warning => 0x10,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Validation => "validation",
            Phase::Authentication => "authentication",
            Phase::Dependency => "dependency",
            Phase::BootLevel => "boot-level",
            Phase::Warning => "warning",
        };
        f.write_str(name)
    }
}

/// Set of phases, used to flush selectively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseMask(u32);

impl PhaseMask {
    pub const ALL: PhaseMask = PhaseMask(u32::MAX);

    pub fn with(self, phase: Phase) -> Self {
        PhaseMask(self.0 | phase.bit())
    }

    pub fn matches(self, phase: Phase) -> bool {
        self.0 & phase.bit() != 0
    }
}

impl From<Phase> for PhaseMask {
    fn from(phase: Phase) -> Self {
        PhaseMask(phase.bit())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Warning,
    Error,
}

/// One structured failure record for one bundle in one phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub identifier: String,
    pub phase: Phase,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.phase, self.identifier, self.message)
    }
}

/// Append-only diagnostic log, keyed by bundle identifier.
///
/// Entries are never overwritten; repeated reports accumulate until
/// flushed for a bundle (or for all bundles) under a phase mask.
#[derive(Debug, Default)]
pub struct DiagnosticsCollector {
    by_bundle: HashMap<String, Vec<Diagnostic>>,
}

impl DiagnosticsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic.
    pub fn report(
        &mut self,
        identifier: impl Into<String>,
        phase: Phase,
        severity: Severity,
        message: impl Into<String>,
    ) {
        let identifier = identifier.into();
        let message = message.into();
        tracing::debug!(%identifier, %phase, %message, "diagnostic recorded");
        self.by_bundle
            .entry(identifier.clone())
            .or_default()
            .push(Diagnostic {
                identifier,
                phase,
                severity,
                message,
            });
    }

    /// All diagnostics recorded for one bundle, in report order.
    pub fn for_bundle(&self, identifier: &str) -> &[Diagnostic] {
        self.by_bundle
            .get(identifier)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All diagnostics, ordered by bundle identifier then report order.
    pub fn all(&self) -> Vec<&Diagnostic> {
        let mut identifiers: Vec<&String> = self.by_bundle.keys().collect();
        identifiers.sort();
        identifiers
            .into_iter()
            .flat_map(|id| self.by_bundle[id].iter())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.by_bundle.values().all(Vec::is_empty)
    }

    /// Drop diagnostics matching the phase mask, for one bundle or for
    /// every bundle when `identifier` is `None`.
    pub fn flush(&mut self, identifier: Option<&str>, phases: PhaseMask) {
        match identifier {
            Some(id) => {
                if let Some(entries) = self.by_bundle.get_mut(id) {
                    entries.retain(|d| !phases.matches(d.phase));
                }
            }
            None => {
                for entries in self.by_bundle.values_mut() {
                    entries.retain(|d| !phases.matches(d.phase));
                }
            }
        }
        self.by_bundle.retain(|_, entries| !entries.is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reports_accumulate() {
        let mut collector = DiagnosticsCollector::new();
        collector.report("com.example.a", Phase::Dependency, Severity::Error, "first");
        collector.report("com.example.a", Phase::Dependency, Severity::Error, "first");
        assert_eq!(collector.for_bundle("com.example.a").len(), 2);
    }

    #[test]
    fn test_reading_does_not_mutate() {
        let mut collector = DiagnosticsCollector::new();
        collector.report("com.example.a", Phase::Warning, Severity::Warning, "w");
        let _ = collector.for_bundle("com.example.a");
        let _ = collector.all();
        assert_eq!(collector.for_bundle("com.example.a").len(), 1);
    }

    #[test]
    fn test_flush_by_phase_mask() {
        let mut collector = DiagnosticsCollector::new();
        collector.report("com.example.a", Phase::Dependency, Severity::Error, "dep");
        collector.report("com.example.a", Phase::Validation, Severity::Error, "val");

        collector.flush(Some("com.example.a"), Phase::Dependency.into());
        let remaining = collector.for_bundle("com.example.a");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].phase, Phase::Validation);
    }

    #[test]
    fn test_flush_all_bundles() {
        let mut collector = DiagnosticsCollector::new();
        collector.report("com.example.a", Phase::Dependency, Severity::Error, "a");
        collector.report("com.example.b", Phase::Dependency, Severity::Error, "b");

        collector.flush(None, PhaseMask::ALL);
        assert!(collector.is_empty());
    }

    #[test]
    fn test_all_sorted_by_identifier() {
        let mut collector = DiagnosticsCollector::new();
        collector.report("com.example.z", Phase::Dependency, Severity::Error, "z");
        collector.report("com.example.a", Phase::Dependency, Severity::Error, "a");

        let all = collector.all();
        assert_eq!(all[0].identifier, "com.example.a");
        assert_eq!(all[1].identifier, "com.example.z");
    }
}
