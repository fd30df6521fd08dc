//! emurig CLI - staged emulator configuration editing
//!
//! Provides `emurig emulator`, `emurig profile`, `emurig scanner`,
//! `emurig import`, and `emurig catalog` commands. Every mutating command
//! runs one edit session against the configuration database and commits it
//! in a single buffered transaction.

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use emurig_core::catalog::{load_catalog_dir, EmulatorCatalog, StaticCatalog};
use emurig_core::storage::Database;

use commands::emulator::EmulatorCommands;
use commands::profile::ProfileCommands;
use commands::scanner::ScannerCommands;

#[derive(Parser)]
#[command(name = "emurig")]
#[command(about = "emurig - emulator configuration manager")]
#[command(version)]
struct Cli {
    /// Configuration database (defaults to the user data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Directory of catalog definition files
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage emulator configurations
    Emulator {
        #[command(subcommand)]
        action: EmulatorCommands,
    },
    /// Manage an emulator's launch profiles
    Profile {
        #[command(subcommand)]
        action: ProfileCommands,
    },
    /// Manage rom scanner configurations
    Scanner {
        #[command(subcommand)]
        action: ScannerCommands,
    },
    /// Import detected emulators from a candidate file
    Import {
        /// JSON file of import candidates
        file: PathBuf,
        /// Preview changes without applying
        #[arg(long)]
        dry_run: bool,
    },
    /// List known catalog definitions
    Catalog,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let db_path = match cli.db {
        Some(path) => path,
        None => default_data_dir()?.join("emurig.db"),
    };
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create {}", parent.display()))?;
    }
    let db = Database::open(&db_path)?;

    let catalog: StaticCatalog = match cli.catalog {
        Some(dir) => load_catalog_dir(&dir)?,
        None => load_catalog_dir(&default_data_dir()?.join("catalog"))?,
    };

    match cli.command {
        Commands::Emulator { action } => commands::emulator::execute(action, &db, &catalog),
        Commands::Profile { action } => commands::profile::execute(action, &db, &catalog),
        Commands::Scanner { action } => commands::scanner::execute(action, &db, &catalog),
        Commands::Import { file, dry_run } => {
            commands::import::execute(&file, &db, &catalog, dry_run)
        }
        Commands::Catalog => {
            for entry in catalog.entries() {
                println!("{}  {}  profiles: {}", entry.id, entry.name, entry.profiles.join(", "));
            }
            Ok(())
        }
    }
}

fn default_data_dir() -> Result<PathBuf> {
    Ok(dirs::data_dir()
        .context("Cannot determine the user data directory")?
        .join("emurig"))
}
