//! Profile CLI commands
//!
//! Handles: emurig profile list/add/remove/copy/set-exe

use anyhow::{anyhow, bail, Result};
use clap::Subcommand;
use emurig_core::catalog::EmulatorCatalog;
use emurig_core::session::{EditSession, ProfileMenuEntry, ProfileSlot};
use emurig_core::storage::Database;

use super::{find_emulator, resolve_session, CliPrompts};

/// Profile commands
#[derive(Subcommand)]
pub enum ProfileCommands {
    /// List an emulator's profiles
    List {
        /// Emulator name or id
        emulator: String,
    },
    /// Add a profile
    ///
    /// Without --builtin a blank custom profile is added; with it, the named
    /// catalog profile.
    Add {
        /// Emulator name or id
        emulator: String,
        /// Catalog profile name to add as a built-in profile
        #[arg(long)]
        builtin: Option<String>,
        /// Preview changes without applying
        #[arg(long)]
        dry_run: bool,
    },
    /// Remove a profile by name
    Remove {
        /// Emulator name or id
        emulator: String,
        /// Profile name
        name: String,
        /// Preview changes without applying
        #[arg(long)]
        dry_run: bool,
    },
    /// Duplicate a custom profile
    Copy {
        /// Emulator name or id
        emulator: String,
        /// Custom profile name
        name: String,
        /// Preview changes without applying
        #[arg(long)]
        dry_run: bool,
    },
    /// Set a custom profile's executable
    SetExe {
        /// Emulator name or id
        emulator: String,
        /// Custom profile name
        name: String,
        /// Executable path
        #[arg(long)]
        path: std::path::PathBuf,
        /// Preview changes without applying
        #[arg(long)]
        dry_run: bool,
    },
}

/// Slot of the first profile with the given name, custom profiles first
fn find_profile(session: &EditSession<'_>, name: &str) -> Result<ProfileSlot> {
    let emulator = session
        .selected_emulator()
        .ok_or_else(|| anyhow!("No emulator selected"))?;
    if let Some(i) = emulator.custom_profiles.iter().position(|p| p.name == name) {
        return Ok(ProfileSlot::Custom(i));
    }
    if let Some(i) = emulator.builtin_profiles.iter().position(|p| p.name == name) {
        return Ok(ProfileSlot::BuiltIn(i));
    }
    bail!("Profile not found: {name}")
}

pub fn execute(
    action: ProfileCommands,
    db: &Database,
    catalog: &dyn EmulatorCatalog,
) -> Result<()> {
    match action {
        ProfileCommands::List { emulator } => {
            let prompts = CliPrompts::new(false);
            let mut session = EditSession::open(db, catalog, &prompts)?;
            let index = find_emulator(&session, &emulator)?;
            session.select_emulator(Some(index));

            let emulator = session
                .selected_emulator()
                .ok_or_else(|| anyhow!("Emulator not found: {emulator}"))?;
            for profile in &emulator.builtin_profiles {
                println!("built-in: {} -> {}", profile.name, profile.builtin_profile_name);
            }
            for profile in &emulator.custom_profiles {
                let exe = profile.executable.as_deref().unwrap_or("-");
                println!("custom: {} ({})  exe: {exe}", profile.name, profile.id);
            }
            if let Some(candidates) = session.builtin_candidates() {
                println!("available built-in: {}", candidates.join(", "));
            }
            session.cancel();
            Ok(())
        }
        ProfileCommands::Add {
            emulator,
            builtin,
            dry_run,
        } => {
            let prompts = CliPrompts::new(false);
            let mut session = EditSession::open(db, catalog, &prompts)?;
            let index = find_emulator(&session, &emulator)?;
            session.select_emulator(Some(index));

            match builtin {
                Some(name) => {
                    // Only entries the menu would offer are valid
                    let menu = session
                        .begin_add_profile()?
                        .ok_or_else(|| anyhow!("{emulator} has no catalog definition"))?;
                    let entry = ProfileMenuEntry::BuiltIn(name.clone());
                    if !menu.contains(&entry) {
                        bail!("Unknown built-in profile: {name}");
                    }
                    session.apply_menu_entry(&entry)?;
                }
                None => session.add_custom_profile()?,
            }
            resolve_session(session, dry_run)
        }
        ProfileCommands::Remove {
            emulator,
            name,
            dry_run,
        } => {
            let prompts = CliPrompts::new(false);
            let mut session = EditSession::open(db, catalog, &prompts)?;
            let index = find_emulator(&session, &emulator)?;
            session.select_emulator(Some(index));
            let slot = find_profile(&session, &name)?;
            session.remove_profile(slot)?;
            resolve_session(session, dry_run)
        }
        ProfileCommands::Copy {
            emulator,
            name,
            dry_run,
        } => {
            let prompts = CliPrompts::new(false);
            let mut session = EditSession::open(db, catalog, &prompts)?;
            let index = find_emulator(&session, &emulator)?;
            session.select_emulator(Some(index));
            match find_profile(&session, &name)? {
                ProfileSlot::Custom(i) => session.copy_profile(i)?,
                ProfileSlot::BuiltIn(_) => bail!("Only custom profiles can be duplicated"),
            }
            resolve_session(session, dry_run)
        }
        ProfileCommands::SetExe {
            emulator,
            name,
            path,
            dry_run,
        } => {
            let mut prompts = CliPrompts::new(false);
            prompts.file = Some(path);
            let mut session = EditSession::open(db, catalog, &prompts)?;
            let index = find_emulator(&session, &emulator)?;
            session.select_emulator(Some(index));
            let slot = find_profile(&session, &name)?;
            session.select_profile(Some(slot));
            session.set_profile_executable()?;
            resolve_session(session, dry_run)
        }
    }
}
