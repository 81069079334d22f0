//! kextplan CLI
//!
//! Plans dependency-respecting load orders for kernel extension bundles
//! from a catalog snapshot.

mod cli;
mod commands;
mod error;
mod snapshot;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;
use snapshot::CatalogSnapshot;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    let Some(command) = cli.command else {
        println!("{} Kext load-order planner", "kextplan".green().bold());
        println!();
        println!("Run {} for available commands.", "kextplan --help".cyan());
        return Ok(());
    };

    let catalog = CatalogSnapshot::load(&cli.catalog)?.into_catalog();

    match command {
        Commands::Loadlist {
            identifiers,
            need_all,
            json,
        } => commands::run_loadlist(&catalog, &identifiers, need_all, json),
        Commands::Resolve { identifier, json } => {
            commands::run_resolve(&catalog, &identifier, json)
        }
        Commands::Deps {
            identifier,
            kind,
            need_all,
            json,
        } => commands::run_deps(&catalog, &identifier, kind, need_all, json),
        Commands::Filter { flags, json } => commands::run_filter(&catalog, &flags, json),
        Commands::List { json } => commands::run_list(&catalog, json),
    }
}
