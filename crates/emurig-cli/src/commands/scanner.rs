//! Scanner CLI commands
//!
//! Handles: emurig scanner list/add/remove/rename

use anyhow::Result;
use clap::Subcommand;
use emurig_core::catalog::EmulatorCatalog;
use emurig_core::session::EditSession;
use emurig_core::storage::Database;

use super::{find_scanner, resolve_session, CliPrompts};

/// Scanner commands
#[derive(Subcommand)]
pub enum ScannerCommands {
    /// List scanner configurations
    List,
    /// Add a new scanner config
    Add {
        /// Scanner name (defaults to "Config")
        name: Option<String>,
        /// Preview changes without applying
        #[arg(long)]
        dry_run: bool,
    },
    /// Remove a scanner config
    Remove {
        /// Scanner name or id
        scanner: String,
        /// Preview changes without applying
        #[arg(long)]
        dry_run: bool,
    },
    /// Rename a scanner config
    Rename {
        /// Scanner name or id
        scanner: String,
        /// New name
        name: String,
        /// Preview changes without applying
        #[arg(long)]
        dry_run: bool,
    },
}

pub fn execute(action: ScannerCommands, db: &Database, catalog: &dyn EmulatorCatalog) -> Result<()> {
    match action {
        ScannerCommands::List => {
            for scanner in db.scanners().list()? {
                println!("{}  {}", scanner.id, scanner.name);
            }
            Ok(())
        }
        ScannerCommands::Add { name, dry_run } => {
            let prompts = CliPrompts::new(false);
            let mut session = EditSession::open(db, catalog, &prompts)?;
            session.add_scanner();
            if let (Some(name), Some(scanner)) = (name, session.selected_scanner_mut()) {
                scanner.name = name;
            }
            resolve_session(session, dry_run)
        }
        ScannerCommands::Remove { scanner, dry_run } => {
            let prompts = CliPrompts::new(false);
            let mut session = EditSession::open(db, catalog, &prompts)?;
            let index = find_scanner(&session, &scanner)?;
            session.remove_scanner(index);
            resolve_session(session, dry_run)
        }
        ScannerCommands::Rename {
            scanner,
            name,
            dry_run,
        } => {
            let prompts = CliPrompts::new(false);
            let mut session = EditSession::open(db, catalog, &prompts)?;
            let index = find_scanner(&session, &scanner)?;
            session.select_scanner(Some(index));
            if let Some(scanner) = session.selected_scanner_mut() {
                scanner.name = name;
            }
            resolve_session(session, dry_run)
        }
    }
}
