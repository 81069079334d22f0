//! Error types for the kext graph library.

/// Result type for kext graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced as call-level outcomes.
///
/// Per-slot resolution failures are not errors; they are recorded as
/// diagnostics and degrade results from complete to partial. Only
/// closure-completeness failures and cycles reach this type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A `need_all` query found an unresolved dependency somewhere in the
    /// requested closure.
    #[error("dependency closure of '{identifier}' is incomplete")]
    IncompleteClosure { identifier: String },

    /// A dependency cycle was found during load-list planning.
    #[error("cyclic dependency involving: {}", participants.join(", "))]
    DependencyCycle { participants: Vec<String> },

    /// A bundle identifier not present in the catalog was requested.
    #[error("unknown bundle: {identifier}")]
    UnknownBundle { identifier: String },

    /// A declared dependency range has min > max.
    #[error("invalid requirement on '{identifier}': minimum {min} exceeds maximum {max}")]
    InvalidRequirement {
        identifier: String,
        min: String,
        max: String,
    },
}
