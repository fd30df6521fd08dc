//! Import command
//!
//! Reads import candidates from a JSON file produced by a detection peer and
//! adds the accepted ones to the working copy.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use emurig_core::catalog::EmulatorCatalog;
use emurig_core::session::{EditSession, ImportCandidate};
use emurig_core::storage::Database;

use super::{resolve_session, CliPrompts};

pub fn execute(
    file: &Path,
    db: &Database,
    catalog: &dyn EmulatorCatalog,
    dry_run: bool,
) -> Result<()> {
    let json = fs::read_to_string(file)
        .with_context(|| format!("Cannot read candidates from {}", file.display()))?;
    let candidates: Vec<ImportCandidate> =
        serde_json::from_str(&json).context("Invalid import candidate file")?;

    let prompts = CliPrompts::new(false);
    let mut session = EditSession::open(db, catalog, &prompts)?;
    let imported = session.import_candidates(&candidates);

    if imported == 0 {
        println!("Nothing selected for import");
        session.cancel();
        return Ok(());
    }

    println!("Importing {imported} emulator(s)");
    resolve_session(session, dry_run)
}
