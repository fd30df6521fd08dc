//! Staged-edit session over the emulator and scanner collections
//!
//! A session clones both collections from the store at open time. All edits
//! mutate the working copies only; nothing touches the store until
//! [`EditSession::confirm`], which reconciles both collections inside one
//! buffered update scope. [`EditSession::cancel`] discards everything.

pub mod import;
pub mod selection;

use thiserror::Error;

use crate::catalog::EmulatorCatalog;
use crate::model::{BuiltinProfile, CustomProfile, Emulator, EmulatorProfile, ScannerConfig};
use crate::prompts::Prompts;
use crate::reconcile::{ReconcilePlan, ReconcileReport};
use crate::storage::{Database, StorageError};

pub use import::{ImportCandidate, ImportProfile};
pub use selection::{ProfileMenuEntry, ProfileSlot, Selection};

/// Session-level errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No emulator selected")]
    NoSelection,

    #[error("No custom profile selected")]
    NoProfileSelected,

    #[error("Unknown catalog definition: {0}")]
    UnknownCatalogEntry(String),

    #[error("Session already resolved")]
    Resolved,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A staged-edit session
pub struct EditSession<'a> {
    db: &'a Database,
    catalog: &'a dyn EmulatorCatalog,
    prompts: &'a dyn Prompts,
    emulators: Vec<Emulator>,
    scanners: Vec<ScannerConfig>,
    selection: Selection,
    outcome: Option<bool>,
}

impl<'a> EditSession<'a> {
    /// Open a session, cloning both collections from the store
    ///
    /// The first emulator and scanner, if any, become selected.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn open(
        db: &'a Database,
        catalog: &'a dyn EmulatorCatalog,
        prompts: &'a dyn Prompts,
    ) -> Result<Self, StorageError> {
        let emulators = db.emulators().list()?;
        let scanners = db.scanners().list()?;

        let mut session = Self {
            db,
            catalog,
            prompts,
            emulators,
            scanners,
            selection: Selection::default(),
            outcome: None,
        };
        session.select_emulator(if session.emulators.is_empty() {
            None
        } else {
            Some(0)
        });
        session.select_scanner(if session.scanners.is_empty() {
            None
        } else {
            Some(0)
        });
        Ok(session)
    }

    // ------------------------------------------------------------------
    // Working copies and selection views

    /// Working copy of the emulator collection
    #[must_use]
    pub fn emulators(&self) -> &[Emulator] {
        &self.emulators
    }

    /// Working copy of the scanner collection
    #[must_use]
    pub fn scanners(&self) -> &[ScannerConfig] {
        &self.scanners
    }

    /// The selected emulator, if any
    #[must_use]
    pub fn selected_emulator(&self) -> Option<&Emulator> {
        self.selection.emulator.map(|i| &self.emulators[i])
    }

    /// Mutable access to the selected emulator for free-form edits
    ///
    /// Catalog-key changes must go through [`Self::set_builtin_config`] so
    /// the candidate list stays consistent.
    pub fn selected_emulator_mut(&mut self) -> Option<&mut Emulator> {
        self.selection.emulator.map(|i| &mut self.emulators[i])
    }

    /// Index of the selected emulator
    #[must_use]
    pub fn selected_emulator_index(&self) -> Option<usize> {
        self.selection.emulator
    }

    /// The selected profile of either variant, if any
    #[must_use]
    pub fn selected_profile(&self) -> Option<EmulatorProfile<'_>> {
        let emulator = self.selected_emulator()?;
        match self.selection.profile? {
            ProfileSlot::BuiltIn(i) => {
                emulator.builtin_profiles.get(i).map(EmulatorProfile::BuiltIn)
            }
            ProfileSlot::Custom(i) => emulator.custom_profiles.get(i).map(EmulatorProfile::Custom),
        }
    }

    /// The selected custom profile; `None` when a built-in one is selected
    #[must_use]
    pub fn selected_custom_profile(&self) -> Option<&CustomProfile> {
        match self.selected_profile()? {
            EmulatorProfile::Custom(p) => Some(p),
            EmulatorProfile::BuiltIn(_) => None,
        }
    }

    /// The selected built-in profile; `None` when a custom one is selected
    #[must_use]
    pub fn selected_builtin_profile(&self) -> Option<&BuiltinProfile> {
        match self.selected_profile()? {
            EmulatorProfile::BuiltIn(p) => Some(p),
            EmulatorProfile::Custom(_) => None,
        }
    }

    /// Catalog profile names offered for the add-profile affordance
    #[must_use]
    pub fn builtin_candidates(&self) -> Option<&[String]> {
        self.selection.candidates.as_deref()
    }

    /// The selected scanner, if any
    #[must_use]
    pub fn selected_scanner(&self) -> Option<&ScannerConfig> {
        self.selection.scanner.map(|i| &self.scanners[i])
    }

    /// Select an emulator by index
    ///
    /// Resets the profile selection to the new emulator's first custom
    /// profile and re-derives the built-in candidate list. Out-of-range
    /// indices clear the selection.
    pub fn select_emulator(&mut self, index: Option<usize>) {
        let index = index.filter(|i| *i < self.emulators.len());
        self.selection.emulator = index;
        match index.map(|i| &self.emulators[i]) {
            Some(emulator) => {
                self.selection.profile = selection::default_profile_slot(emulator);
                self.selection.candidates = selection::derive_candidates(emulator, self.catalog);
            }
            None => {
                self.selection.profile = None;
                self.selection.candidates = None;
            }
        }
    }

    /// Select a profile of the selected emulator
    pub fn select_profile(&mut self, slot: Option<ProfileSlot>) {
        let slot = match (slot, self.selected_emulator()) {
            (Some(ProfileSlot::BuiltIn(i)), Some(e)) if i < e.builtin_profiles.len() => {
                Some(ProfileSlot::BuiltIn(i))
            }
            (Some(ProfileSlot::Custom(i)), Some(e)) if i < e.custom_profiles.len() => {
                Some(ProfileSlot::Custom(i))
            }
            _ => None,
        };
        self.selection.profile = slot;
    }

    /// Select a scanner by index
    pub fn select_scanner(&mut self, index: Option<usize>) {
        self.selection.scanner = index.filter(|i| *i < self.scanners.len());
    }

    /// Change the selected emulator's catalog key
    ///
    /// Re-derives the candidate list; the profile selection and any
    /// already-attached built-in profile instances are untouched.
    ///
    /// # Errors
    /// Returns [`SessionError::NoSelection`] if no emulator is selected.
    pub fn set_builtin_config(&mut self, key: Option<String>) -> Result<(), SessionError> {
        let index = self.selection.emulator.ok_or(SessionError::NoSelection)?;
        self.emulators[index].builtin_config_id = key;
        self.selection.candidates =
            selection::derive_candidates(&self.emulators[index], self.catalog);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Emulator operations

    /// Append a new emulator and select it
    pub fn add_emulator(&mut self, name: &str) -> &Emulator {
        self.emulators.push(Emulator::new(name));
        self.select_emulator(Some(self.emulators.len() - 1));
        &self.emulators[self.emulators.len() - 1]
    }

    /// Remove an emulator from the working copy
    ///
    /// If game actions reference it, the user is asked once to confirm;
    /// declining leaves the working copy unchanged. Returns whether the
    /// emulator was removed. The check happens here, not at confirm time.
    ///
    /// # Errors
    /// Returns an error if the reference query fails.
    pub fn remove_emulator(&mut self, index: usize) -> Result<bool, SessionError> {
        let Some(emulator) = self.emulators.get(index) else {
            return Ok(false);
        };

        let references = self.db.references().emulator_reference_count(emulator.id)?;
        if references > 0 {
            let message = format!(
                "{} is referenced by {references} game action(s). Remove it anyway?",
                emulator.name
            );
            if !self.prompts.confirm(&message) {
                return Ok(false);
            }
        }

        self.emulators.remove(index);
        let next = if self.emulators.is_empty() { None } else { Some(0) };
        self.select_emulator(next);
        Ok(true)
    }

    /// Duplicate an emulator and select the copy
    ///
    /// The copy gets fresh identities throughout, so committing it never
    /// aliases the original in the store.
    pub fn copy_emulator(&mut self, index: usize) -> Option<&Emulator> {
        let copy = self.emulators.get(index)?.duplicate();
        self.emulators.push(copy);
        self.select_emulator(Some(self.emulators.len() - 1));
        Some(&self.emulators[self.emulators.len() - 1])
    }

    // ------------------------------------------------------------------
    // Profile operations

    /// Start adding a profile to the selected emulator
    ///
    /// With a catalog key this returns the menu entries to choose from: one
    /// built-in entry per resolved catalog profile plus a trailing custom
    /// entry. Without a key a blank custom profile is appended directly and
    /// `None` is returned. A key that does not resolve is an error and
    /// leaves the emulator's profiles unchanged.
    ///
    /// # Errors
    /// Returns [`SessionError::NoSelection`] without a selected emulator, or
    /// [`SessionError::UnknownCatalogEntry`] for an unresolvable key.
    pub fn begin_add_profile(&mut self) -> Result<Option<Vec<ProfileMenuEntry>>, SessionError> {
        let key = self
            .selected_emulator()
            .ok_or(SessionError::NoSelection)?
            .builtin_config_id
            .clone();

        match key {
            None => {
                self.add_custom_profile()?;
                Ok(None)
            }
            Some(key) => match self.catalog.resolve(&key) {
                None => Err(SessionError::UnknownCatalogEntry(key)),
                Some(entry) => {
                    let mut items: Vec<ProfileMenuEntry> = entry
                        .profiles
                        .iter()
                        .cloned()
                        .map(ProfileMenuEntry::BuiltIn)
                        .collect();
                    items.push(ProfileMenuEntry::Custom);
                    Ok(Some(items))
                }
            },
        }
    }

    /// Apply a menu entry chosen from [`Self::begin_add_profile`]
    ///
    /// # Errors
    /// Returns [`SessionError::NoSelection`] if no emulator is selected.
    pub fn apply_menu_entry(&mut self, entry: &ProfileMenuEntry) -> Result<(), SessionError> {
        match entry {
            ProfileMenuEntry::BuiltIn(name) => self.add_builtin_profile(name),
            ProfileMenuEntry::Custom => self.add_custom_profile(),
        }
    }

    /// Append a blank custom profile to the selected emulator and select it
    ///
    /// # Errors
    /// Returns [`SessionError::NoSelection`] if no emulator is selected.
    pub fn add_custom_profile(&mut self) -> Result<(), SessionError> {
        let index = self.selection.emulator.ok_or(SessionError::NoSelection)?;
        let emulator = &mut self.emulators[index];
        emulator.custom_profiles.push(CustomProfile::new());
        self.selection.profile = Some(ProfileSlot::Custom(emulator.custom_profiles.len() - 1));
        Ok(())
    }

    /// Append a built-in profile for the given catalog profile name and
    /// select it
    ///
    /// # Errors
    /// Returns [`SessionError::NoSelection`] if no emulator is selected.
    pub fn add_builtin_profile(&mut self, profile_name: &str) -> Result<(), SessionError> {
        let index = self.selection.emulator.ok_or(SessionError::NoSelection)?;
        let emulator = &mut self.emulators[index];
        emulator.builtin_profiles.push(BuiltinProfile {
            name: profile_name.to_string(),
            builtin_profile_name: profile_name.to_string(),
        });
        self.selection.profile = Some(ProfileSlot::BuiltIn(emulator.builtin_profiles.len() - 1));
        Ok(())
    }

    /// Remove a profile of the selected emulator
    ///
    /// # Errors
    /// Returns [`SessionError::NoSelection`] if no emulator is selected.
    pub fn remove_profile(&mut self, slot: ProfileSlot) -> Result<(), SessionError> {
        let index = self.selection.emulator.ok_or(SessionError::NoSelection)?;
        let emulator = &mut self.emulators[index];
        match slot {
            ProfileSlot::BuiltIn(i) if i < emulator.builtin_profiles.len() => {
                emulator.builtin_profiles.remove(i);
            }
            ProfileSlot::Custom(i) if i < emulator.custom_profiles.len() => {
                emulator.custom_profiles.remove(i);
            }
            _ => return Ok(()),
        }
        self.selection.profile = shift_after_removal(self.selection.profile, slot);
        Ok(())
    }

    /// Duplicate a custom profile of the selected emulator and select the
    /// copy
    ///
    /// # Errors
    /// Returns [`SessionError::NoSelection`] if no emulator is selected.
    pub fn copy_profile(&mut self, custom_index: usize) -> Result<(), SessionError> {
        let index = self.selection.emulator.ok_or(SessionError::NoSelection)?;
        let emulator = &mut self.emulators[index];
        let Some(profile) = emulator.custom_profiles.get(custom_index) else {
            return Ok(());
        };
        emulator.custom_profiles.push(profile.duplicate());
        self.selection.profile = Some(ProfileSlot::Custom(emulator.custom_profiles.len() - 1));
        Ok(())
    }

    /// Pick an executable for the selected custom profile
    ///
    /// Returns whether a path was set; no selection made is a no-op.
    ///
    /// # Errors
    /// Returns [`SessionError::NoProfileSelected`] without a selected custom
    /// profile.
    pub fn set_profile_executable(&mut self) -> Result<bool, SessionError> {
        let (index, profile_index) = match (self.selection.emulator, self.selection.profile) {
            (Some(e), Some(ProfileSlot::Custom(p))) => (e, p),
            _ => return Err(SessionError::NoProfileSelected),
        };

        // The slot may be stale after free-form edits through
        // selected_emulator_mut
        let Some(profile) = self
            .emulators
            .get_mut(index)
            .and_then(|e| e.custom_profiles.get_mut(profile_index))
        else {
            return Err(SessionError::NoProfileSelected);
        };

        match self.prompts.select_file() {
            Some(path) => {
                profile.executable = Some(path.display().to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ------------------------------------------------------------------
    // Scanner operations

    /// Append a new scanner config and select it
    pub fn add_scanner(&mut self) -> &ScannerConfig {
        self.scanners.push(ScannerConfig::new("Config"));
        self.selection.scanner = Some(self.scanners.len() - 1);
        &self.scanners[self.scanners.len() - 1]
    }

    /// Mutable access to the selected scanner
    pub fn selected_scanner_mut(&mut self) -> Option<&mut ScannerConfig> {
        self.selection.scanner.map(|i| &mut self.scanners[i])
    }

    /// Remove a scanner config from the working copy
    pub fn remove_scanner(&mut self, index: usize) -> bool {
        if index >= self.scanners.len() {
            return false;
        }
        self.scanners.remove(index);
        self.selection.scanner = if self.scanners.is_empty() { None } else { Some(0) };
        true
    }

    // ------------------------------------------------------------------
    // Import

    /// Translate accepted import candidates into working-copy emulators
    ///
    /// Candidates with no accepted profile are skipped; an empty list is a
    /// no-op. Every imported emulator gets a fresh identity and its built-in
    /// profiles mapped 1:1 from the accepted descriptors. Returns the number
    /// of emulators added.
    pub fn import_candidates(&mut self, candidates: &[ImportCandidate]) -> usize {
        let mut imported = 0;
        for candidate in candidates {
            let accepted: Vec<&ImportProfile> =
                candidate.profiles.iter().filter(|p| p.import).collect();
            if accepted.is_empty() {
                continue;
            }

            let mut emulator = Emulator::new(&candidate.name);
            emulator.builtin_config_id = Some(candidate.config_id.clone());
            emulator.install_dir = candidate.install_dir.clone();
            emulator.builtin_profiles = accepted
                .iter()
                .map(|p| BuiltinProfile {
                    name: p.name.clone(),
                    builtin_profile_name: p.profile_name.clone(),
                })
                .collect();

            self.emulators.push(emulator);
            imported += 1;
        }
        imported
    }

    // ------------------------------------------------------------------
    // Resolution

    /// Pending reconcile plans for both collections, against current store
    /// state
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn plan(
        &self,
    ) -> Result<(ReconcilePlan<Emulator>, ReconcilePlan<ScannerConfig>), StorageError> {
        Ok((
            ReconcilePlan::build(&self.emulators, &self.db.emulators())?,
            ReconcilePlan::build(&self.scanners, &self.db.scanners())?,
        ))
    }

    /// Reconcile both collections into the store in one buffered update
    /// scope
    ///
    /// On failure the scope rolls back and the working copies stay intact,
    /// so the session can be retried or cancelled.
    ///
    /// # Errors
    /// Returns [`SessionError::Resolved`] if the session already ended, or a
    /// storage error from any reconcile phase.
    pub fn confirm(&mut self) -> Result<ReconcileReport, SessionError> {
        if self.outcome.is_some() {
            return Err(SessionError::Resolved);
        }

        let scope = self.db.buffered_update()?;
        let emulator_plan = ReconcilePlan::build(&self.emulators, &self.db.emulators())?;
        let scanner_plan = ReconcilePlan::build(&self.scanners, &self.db.scanners())?;
        let report =
            emulator_plan.apply(&self.db.emulators())? + scanner_plan.apply(&self.db.scanners())?;
        scope.commit()?;

        self.outcome = Some(true);
        tracing::debug!(
            removed = report.removed,
            added = report.added,
            updated = report.updated,
            "session confirmed"
        );
        Ok(report)
    }

    /// End the session without touching the store
    pub fn cancel(&mut self) {
        if self.outcome.is_none() {
            self.outcome = Some(false);
        }
    }

    /// Outcome of the session: confirmed, cancelled, or not yet resolved
    #[must_use]
    pub fn outcome(&self) -> Option<bool> {
        self.outcome
    }
}

/// Adjust a profile selection after removing `removed` from the same parent
fn shift_after_removal(
    current: Option<ProfileSlot>,
    removed: ProfileSlot,
) -> Option<ProfileSlot> {
    match (current?, removed) {
        (ProfileSlot::BuiltIn(c), ProfileSlot::BuiltIn(r)) => match c {
            c if c == r => None,
            c if c > r => Some(ProfileSlot::BuiltIn(c - 1)),
            c => Some(ProfileSlot::BuiltIn(c)),
        },
        (ProfileSlot::Custom(c), ProfileSlot::Custom(r)) => match c {
            c if c == r => None,
            c if c > r => Some(ProfileSlot::Custom(c - 1)),
            c => Some(ProfileSlot::Custom(c)),
        },
        (current, _) => Some(current),
    }
}
