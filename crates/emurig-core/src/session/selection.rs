//! Selection state and its derivation rules
//!
//! Selection is transient, recomputed imperatively at every point the
//! working set or a catalog key changes. It never persists.

use crate::catalog::EmulatorCatalog;
use crate::model::Emulator;

/// Position of a profile within its parent emulator
///
/// The two variants are mutually exclusive by construction, so the derived
/// custom/built-in selections can never both be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSlot {
    BuiltIn(usize),
    Custom(usize),
}

/// One entry of the add-profile menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileMenuEntry {
    /// Append a built-in profile with the given catalog profile name
    BuiltIn(String),
    /// Append a blank custom profile
    Custom,
}

/// Transient selection state of an edit session
#[derive(Debug, Default)]
pub struct Selection {
    /// Index of the selected emulator in the working copy
    pub(super) emulator: Option<usize>,
    /// Selected profile within the selected emulator
    pub(super) profile: Option<ProfileSlot>,
    /// Catalog profile names offered for adding built-in profiles
    pub(super) candidates: Option<Vec<String>>,
    /// Index of the selected scanner in the working copy
    pub(super) scanner: Option<usize>,
}

/// Candidate built-in profile names for an emulator
///
/// `None` when the emulator has no catalog key, or the key does not resolve
/// (logged, non-fatal).
pub(super) fn derive_candidates(
    emulator: &Emulator,
    catalog: &dyn EmulatorCatalog,
) -> Option<Vec<String>> {
    let key = emulator.builtin_config_id.as_deref()?;
    match catalog.resolve(key) {
        Some(entry) => Some(entry.profiles.clone()),
        None => {
            tracing::warn!(key, emulator = %emulator.name, "unknown catalog definition");
            None
        }
    }
}

/// Default profile selection for a newly selected emulator: its first custom
/// profile, if any
pub(super) fn default_profile_slot(emulator: &Emulator) -> Option<ProfileSlot> {
    if emulator.custom_profiles.is_empty() {
        None
    } else {
        Some(ProfileSlot::Custom(0))
    }
}
