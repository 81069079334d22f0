//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Kext load-order planner - resolve bundle dependencies and plan load orders
#[derive(Parser, Debug)]
#[command(name = "kextplan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the catalog snapshot (JSON)
    #[arg(short, long, global = true, env = "KEXTPLAN_CATALOG", default_value = "catalog.json")]
    pub catalog: PathBuf,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Plan a dependency-respecting load order for one or more bundles
    Loadlist {
        /// Bundle identifiers to plan for, in order
        #[arg(required = true)]
        identifiers: Vec<String>,

        /// Fail instead of omitting bundles with unresolved dependencies
        #[arg(long)]
        need_all: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Resolve a bundle's declared dependencies and show each slot
    Resolve {
        /// Bundle identifier
        identifier: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List a bundle's dependencies (declared, link, all, or indirect)
    Deps {
        /// Bundle identifier
        identifier: String,

        /// Which dependency set to compute
        #[arg(long, default_value = "declared")]
        kind: DepsKind,

        /// Fail if any slot in the requested closure is unresolved
        #[arg(long)]
        need_all: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Select the catalog subset matching boot-requirement flags
    Filter {
        /// Requirement flags (root, local-root, network-root, safe-boot,
        /// console, driverkit)
        #[arg(required = true)]
        flags: Vec<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List every bundle in the catalog
    List {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

/// Dependency set selector for the `deps` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DepsKind {
    /// Direct declared dependencies
    Declared,
    /// Direct dependencies with interface bundles elided
    Link,
    /// Full transitive closure
    All,
    /// Transitive closure minus direct dependencies
    Indirect,
}
