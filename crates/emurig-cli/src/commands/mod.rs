//! CLI command implementations
//!
//! Every mutating command runs one staged-edit session: open, apply the
//! requested edits to the working copy, then either print the pending plan
//! (`--dry-run`) or commit.

pub mod emulator;
pub mod import;
pub mod profile;
pub mod scanner;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use emurig_core::prompts::Prompts;
use emurig_core::reconcile::display::format_plan;
use emurig_core::session::EditSession;

/// Prompt collaborator backed by stdin and command-line arguments
///
/// The file picker dialog of the desktop flow maps to an explicit `--path`
/// argument here.
pub struct CliPrompts {
    pub assume_yes: bool,
    pub file: Option<PathBuf>,
}

impl CliPrompts {
    #[must_use]
    pub fn new(assume_yes: bool) -> Self {
        Self {
            assume_yes,
            file: None,
        }
    }
}

impl Prompts for CliPrompts {
    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{message} [y/N]: ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        if io::stdin().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim(), "y" | "Y" | "yes")
    }

    fn select_file(&self) -> Option<PathBuf> {
        self.file.clone()
    }
}

/// Find a working-copy emulator by name or id
pub fn find_emulator(session: &EditSession<'_>, key: &str) -> Result<usize> {
    session
        .emulators()
        .iter()
        .position(|e| e.name == key || e.id.to_string() == key)
        .ok_or_else(|| anyhow!("Emulator not found: {key}"))
}

/// Find a working-copy scanner by name or id
pub fn find_scanner(session: &EditSession<'_>, key: &str) -> Result<usize> {
    session
        .scanners()
        .iter()
        .position(|s| s.name == key || s.id.to_string() == key)
        .ok_or_else(|| anyhow!("Scanner not found: {key}"))
}

/// Commit the session, or print the pending plan and cancel on dry runs
pub fn resolve_session(mut session: EditSession<'_>, dry_run: bool) -> Result<()> {
    if dry_run {
        let (emulators, scanners) = session.plan()?;
        print!("{}", format_plan("Emulators", &emulators));
        print!("{}", format_plan("Scanners", &scanners));
        session.cancel();
    } else {
        let report = session.confirm()?;
        println!(
            "Committed: {} added, {} updated, {} removed",
            report.added, report.updated, report.removed
        );
    }
    Ok(())
}
