//! Emulator CLI commands
//!
//! Handles: emurig emulator list/add/remove/copy/set-config

use anyhow::{bail, Result};
use clap::Subcommand;
use emurig_core::catalog::EmulatorCatalog;
use emurig_core::session::EditSession;
use emurig_core::storage::Database;

use super::{find_emulator, resolve_session, CliPrompts};

/// Emulator commands
#[derive(Subcommand)]
pub enum EmulatorCommands {
    /// List emulator configurations
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a new emulator
    Add {
        /// Emulator name
        name: String,
        /// Catalog definition key to base it on
        #[arg(long)]
        config: Option<String>,
        /// Install directory
        #[arg(long)]
        install_dir: Option<String>,
        /// Preview changes without applying
        #[arg(long)]
        dry_run: bool,
    },
    /// Remove an emulator
    Remove {
        /// Emulator name or id
        emulator: String,
        /// Skip the reference confirmation prompt
        #[arg(short, long)]
        force: bool,
        /// Preview changes without applying
        #[arg(long)]
        dry_run: bool,
    },
    /// Duplicate an emulator
    Copy {
        /// Emulator name or id
        emulator: String,
        /// Preview changes without applying
        #[arg(long)]
        dry_run: bool,
    },
    /// Change an emulator's catalog definition key
    SetConfig {
        /// Emulator name or id
        emulator: String,
        /// New catalog key; omit to clear
        #[arg(long)]
        config: Option<String>,
        /// Preview changes without applying
        #[arg(long)]
        dry_run: bool,
    },
}

pub fn execute(
    action: EmulatorCommands,
    db: &Database,
    catalog: &dyn EmulatorCatalog,
) -> Result<()> {
    match action {
        EmulatorCommands::List { json } => {
            let emulators = db.emulators().list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&emulators)?);
            } else {
                for emulator in &emulators {
                    let config = emulator.builtin_config_id.as_deref().unwrap_or("-");
                    println!(
                        "{}  {}  config: {config}  profiles: {}",
                        emulator.id,
                        emulator.name,
                        emulator.builtin_profiles.len() + emulator.custom_profiles.len()
                    );
                }
            }
            Ok(())
        }
        EmulatorCommands::Add {
            name,
            config,
            install_dir,
            dry_run,
        } => {
            if let Some(key) = &config {
                if catalog.resolve(key).is_none() {
                    bail!("Unknown catalog definition: {key}");
                }
            }
            let prompts = CliPrompts::new(false);
            let mut session = EditSession::open(db, catalog, &prompts)?;
            session.add_emulator(&name);
            if config.is_some() {
                session.set_builtin_config(config)?;
            }
            if let Some(emulator) = session.selected_emulator_mut() {
                emulator.install_dir = install_dir;
            }
            resolve_session(session, dry_run)
        }
        EmulatorCommands::Remove {
            emulator,
            force,
            dry_run,
        } => {
            let prompts = CliPrompts::new(force);
            let mut session = EditSession::open(db, catalog, &prompts)?;
            let index = find_emulator(&session, &emulator)?;
            if !session.remove_emulator(index)? {
                println!("Removal declined");
                session.cancel();
                return Ok(());
            }
            resolve_session(session, dry_run)
        }
        EmulatorCommands::Copy { emulator, dry_run } => {
            let prompts = CliPrompts::new(false);
            let mut session = EditSession::open(db, catalog, &prompts)?;
            let index = find_emulator(&session, &emulator)?;
            if session.copy_emulator(index).is_none() {
                bail!("Emulator not found: {emulator}");
            }
            resolve_session(session, dry_run)
        }
        EmulatorCommands::SetConfig {
            emulator,
            config,
            dry_run,
        } => {
            let prompts = CliPrompts::new(false);
            let mut session = EditSession::open(db, catalog, &prompts)?;
            let index = find_emulator(&session, &emulator)?;
            session.select_emulator(Some(index));
            session.set_builtin_config(config)?;
            resolve_session(session, dry_run)
        }
    }
}
