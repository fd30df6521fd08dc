//! Edit session tests
//!
//! Working-copy editing, duplication, removal guard, selection cascade,
//! profile menu, import translation, and session resolution.

use std::cell::{Cell, RefCell};
use std::path::PathBuf;

use emurig_core::catalog::{CatalogEntry, StaticCatalog};
use emurig_core::model::{CustomProfile, Emulator, CUSTOM_PROFILE_PREFIX, EMULATOR_DIR_VAR};
use emurig_core::prompts::Prompts;
use emurig_core::session::{
    EditSession, ImportCandidate, ImportProfile, ProfileMenuEntry, ProfileSlot, SessionError,
};
use emurig_core::storage::Database;

/// Scripted prompt answers, recording every confirmation message
struct FakePrompts {
    confirm_answer: Cell<bool>,
    confirm_calls: RefCell<Vec<String>>,
    file: Option<PathBuf>,
}

impl FakePrompts {
    fn answering(confirm_answer: bool) -> Self {
        Self {
            confirm_answer: Cell::new(confirm_answer),
            confirm_calls: RefCell::new(Vec::new()),
            file: None,
        }
    }

    fn with_file(path: &str) -> Self {
        let mut prompts = Self::answering(true);
        prompts.file = Some(PathBuf::from(path));
        prompts
    }
}

impl Prompts for FakePrompts {
    fn confirm(&self, message: &str) -> bool {
        self.confirm_calls.borrow_mut().push(message.to_string());
        self.confirm_answer.get()
    }

    fn select_file(&self) -> Option<PathBuf> {
        self.file.clone()
    }
}

fn test_catalog() -> StaticCatalog {
    StaticCatalog::new(vec![CatalogEntry {
        id: "retroarch".to_string(),
        name: "RetroArch".to_string(),
        profiles: vec!["Default".to_string(), "Fast".to_string()],
    }])
}

fn emulator_with_profiles(name: &str) -> Emulator {
    let mut emulator = Emulator::new(name);
    emulator.custom_profiles.push(CustomProfile::new());
    emulator.custom_profiles.push(CustomProfile::new());
    emulator
}

// =============================================================================
// Session lifecycle
// =============================================================================

#[test]
fn test_open_selects_first_emulator_and_scanner() {
    let db = Database::in_memory().unwrap();
    db.emulators()
        .add(&[emulator_with_profiles("Ares")])
        .unwrap();
    let catalog = test_catalog();
    let prompts = FakePrompts::answering(true);

    let session = EditSession::open(&db, &catalog, &prompts).unwrap();

    assert_eq!(session.selected_emulator().unwrap().name, "Ares");
    assert!(session.selected_custom_profile().is_some());
    assert!(session.outcome().is_none());
}

#[test]
fn test_confirm_persists_edits_and_resolves_session() {
    let db = Database::in_memory().unwrap();
    let catalog = test_catalog();
    let prompts = FakePrompts::answering(true);

    let mut session = EditSession::open(&db, &catalog, &prompts).unwrap();
    session.add_emulator("Dolphin");
    session.add_scanner();
    let report = session.confirm().unwrap();

    assert_eq!(report.added, 2);
    assert_eq!(session.outcome(), Some(true));
    assert_eq!(db.emulators().list().unwrap().len(), 1);
    assert_eq!(db.scanners().list().unwrap().len(), 1);
}

#[test]
fn test_confirm_twice_is_rejected() {
    let db = Database::in_memory().unwrap();
    let catalog = test_catalog();
    let prompts = FakePrompts::answering(true);

    let mut session = EditSession::open(&db, &catalog, &prompts).unwrap();
    session.confirm().unwrap();

    assert!(matches!(session.confirm(), Err(SessionError::Resolved)));
}

#[test]
fn test_cancel_leaves_store_untouched() {
    let db = Database::in_memory().unwrap();
    let catalog = test_catalog();
    let prompts = FakePrompts::answering(true);

    let mut session = EditSession::open(&db, &catalog, &prompts).unwrap();
    session.add_emulator("Never persisted");
    session.cancel();

    assert_eq!(session.outcome(), Some(false));
    assert!(db.emulators().list().unwrap().is_empty());
}

// =============================================================================
// Duplication
// =============================================================================

#[test]
fn test_copy_emulator_gets_fresh_identities() {
    let db = Database::in_memory().unwrap();
    let catalog = test_catalog();
    let prompts = FakePrompts::answering(true);
    let original = emulator_with_profiles("PCSX2");
    db.emulators().add(std::slice::from_ref(&original)).unwrap();

    let mut session = EditSession::open(&db, &catalog, &prompts).unwrap();
    let copy = session.copy_emulator(0).unwrap().clone();

    assert_ne!(copy.id, original.id);
    assert_eq!(copy.name, "PCSX2 Copy");
    assert_eq!(copy.custom_profiles.len(), 2);
    for (copied, source) in copy.custom_profiles.iter().zip(&original.custom_profiles) {
        assert_ne!(copied.id, source.id);
        assert!(copied.id.starts_with(CUSTOM_PROFILE_PREFIX));
        assert_eq!(copied.name, source.name);
        assert_eq!(copied.working_directory, source.working_directory);
    }
    assert_eq!(session.selected_emulator().unwrap().id, copy.id);
}

#[test]
fn test_committed_copy_does_not_alias_original() {
    let db = Database::in_memory().unwrap();
    let catalog = test_catalog();
    let prompts = FakePrompts::answering(true);
    db.emulators().add(&[Emulator::new("Ares")]).unwrap();

    let mut session = EditSession::open(&db, &catalog, &prompts).unwrap();
    session.copy_emulator(0);
    session.confirm().unwrap();

    assert_eq!(db.emulators().list().unwrap().len(), 2);
}

#[test]
fn test_copy_profile_gets_fresh_id() {
    let db = Database::in_memory().unwrap();
    let catalog = test_catalog();
    let prompts = FakePrompts::answering(true);
    db.emulators()
        .add(&[emulator_with_profiles("Ares")])
        .unwrap();

    let mut session = EditSession::open(&db, &catalog, &prompts).unwrap();
    session.copy_profile(0).unwrap();

    let emulator = session.selected_emulator().unwrap();
    assert_eq!(emulator.custom_profiles.len(), 3);
    let copy = &emulator.custom_profiles[2];
    assert_ne!(copy.id, emulator.custom_profiles[0].id);
    assert!(copy.name.ends_with(" Copy"));
    assert_eq!(session.selected_custom_profile().unwrap().id, copy.id);
}

// =============================================================================
// Removal guard
// =============================================================================

#[test]
fn test_remove_unreferenced_emulator_skips_prompt() {
    let db = Database::in_memory().unwrap();
    let catalog = test_catalog();
    let prompts = FakePrompts::answering(false);
    db.emulators().add(&[Emulator::new("Ares")]).unwrap();

    let mut session = EditSession::open(&db, &catalog, &prompts).unwrap();
    assert!(session.remove_emulator(0).unwrap());

    assert!(prompts.confirm_calls.borrow().is_empty());
    assert!(session.emulators().is_empty());
    assert!(session.selected_emulator().is_none());
}

#[test]
fn test_remove_referenced_emulator_prompts_once_with_count() {
    let db = Database::in_memory().unwrap();
    let catalog = test_catalog();
    let prompts = FakePrompts::answering(true);
    let emulator = Emulator::new("PCSX2");
    db.emulators().add(std::slice::from_ref(&emulator)).unwrap();
    db.references().add_reference("FF X", emulator.id).unwrap();
    db.references().add_reference("FF XII", emulator.id).unwrap();

    let mut session = EditSession::open(&db, &catalog, &prompts).unwrap();
    assert!(session.remove_emulator(0).unwrap());

    let calls = prompts.confirm_calls.borrow();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].contains("PCSX2"));
    assert!(calls[0].contains('2'));
}

#[test]
fn test_declined_removal_leaves_working_copy_unchanged() {
    let db = Database::in_memory().unwrap();
    let catalog = test_catalog();
    let prompts = FakePrompts::answering(false);
    let keep = Emulator::new("Ares");
    let target = Emulator::new("PCSX2");
    db.emulators().add(&[keep, target.clone()]).unwrap();
    db.references().add_reference("FF X", target.id).unwrap();

    let mut session = EditSession::open(&db, &catalog, &prompts).unwrap();
    let before: Vec<_> = session.emulators().iter().map(|e| e.id).collect();

    // PCSX2 sorts after Ares
    assert!(!session.remove_emulator(1).unwrap());

    let after: Vec<_> = session.emulators().iter().map(|e| e.id).collect();
    assert_eq!(before, after);
    assert_eq!(prompts.confirm_calls.borrow().len(), 1);
}

// =============================================================================
// Selection cascade
// =============================================================================

#[test]
fn test_selecting_catalog_emulator_derives_candidates() {
    let db = Database::in_memory().unwrap();
    let catalog = test_catalog();
    let prompts = FakePrompts::answering(true);
    let mut emulator = Emulator::new("RetroArch");
    emulator.builtin_config_id = Some("retroarch".to_string());
    db.emulators().add(std::slice::from_ref(&emulator)).unwrap();

    let session = EditSession::open(&db, &catalog, &prompts).unwrap();

    assert_eq!(
        session.builtin_candidates(),
        Some(["Default".to_string(), "Fast".to_string()].as_slice())
    );
}

#[test]
fn test_unresolvable_key_degrades_to_no_candidates() {
    let db = Database::in_memory().unwrap();
    let catalog = test_catalog();
    let prompts = FakePrompts::answering(true);
    let mut emulator = Emulator::new("Mystery");
    emulator.builtin_config_id = Some("gone".to_string());
    db.emulators().add(std::slice::from_ref(&emulator)).unwrap();

    let session = EditSession::open(&db, &catalog, &prompts).unwrap();
    assert!(session.builtin_candidates().is_none());
}

#[test]
fn test_clearing_key_clears_candidates_but_keeps_instances() {
    let db = Database::in_memory().unwrap();
    let catalog = test_catalog();
    let prompts = FakePrompts::answering(true);
    let mut emulator = Emulator::new("RetroArch");
    emulator.builtin_config_id = Some("retroarch".to_string());
    db.emulators().add(std::slice::from_ref(&emulator)).unwrap();

    let mut session = EditSession::open(&db, &catalog, &prompts).unwrap();
    session.add_builtin_profile("Default").unwrap();
    session.set_builtin_config(None).unwrap();

    assert!(session.builtin_candidates().is_none());
    assert_eq!(session.selected_emulator().unwrap().builtin_profiles.len(), 1);
}

#[test]
fn test_setting_key_recomputes_candidates_and_keeps_profile_selection() {
    let db = Database::in_memory().unwrap();
    let catalog = test_catalog();
    let prompts = FakePrompts::answering(true);
    db.emulators()
        .add(&[emulator_with_profiles("Standalone")])
        .unwrap();

    let mut session = EditSession::open(&db, &catalog, &prompts).unwrap();
    assert!(session.builtin_candidates().is_none());
    let selected_before = session.selected_custom_profile().unwrap().id.clone();

    session
        .set_builtin_config(Some("retroarch".to_string()))
        .unwrap();

    assert_eq!(
        session.builtin_candidates(),
        Some(["Default".to_string(), "Fast".to_string()].as_slice())
    );
    assert_eq!(
        session.selected_custom_profile().unwrap().id,
        selected_before
    );
}

#[test]
fn test_custom_and_builtin_selection_are_mutually_exclusive() {
    let db = Database::in_memory().unwrap();
    let catalog = test_catalog();
    let prompts = FakePrompts::answering(true);
    let mut emulator = emulator_with_profiles("RetroArch");
    emulator.builtin_config_id = Some("retroarch".to_string());
    db.emulators().add(std::slice::from_ref(&emulator)).unwrap();

    let mut session = EditSession::open(&db, &catalog, &prompts).unwrap();
    session.add_builtin_profile("Fast").unwrap();

    let checks: Vec<Option<ProfileSlot>> = vec![
        Some(ProfileSlot::Custom(0)),
        Some(ProfileSlot::BuiltIn(0)),
        Some(ProfileSlot::Custom(1)),
        None,
    ];
    for slot in checks {
        session.select_profile(slot);
        let custom = session.selected_custom_profile().is_some();
        let builtin = session.selected_builtin_profile().is_some();
        assert!(!(custom && builtin));
        assert_eq!(session.selected_profile().is_some(), custom || builtin);
    }
}

#[test]
fn test_deselecting_emulator_clears_profile_and_candidates() {
    let db = Database::in_memory().unwrap();
    let catalog = test_catalog();
    let prompts = FakePrompts::answering(true);
    let mut emulator = emulator_with_profiles("RetroArch");
    emulator.builtin_config_id = Some("retroarch".to_string());
    db.emulators().add(std::slice::from_ref(&emulator)).unwrap();

    let mut session = EditSession::open(&db, &catalog, &prompts).unwrap();
    session.select_emulator(None);

    assert!(session.selected_profile().is_none());
    assert!(session.builtin_candidates().is_none());
}

// =============================================================================
// Profile-add menu
// =============================================================================

#[test]
fn test_menu_lists_builtin_entries_plus_custom() {
    let db = Database::in_memory().unwrap();
    let catalog = test_catalog();
    let prompts = FakePrompts::answering(true);
    let mut emulator = Emulator::new("RetroArch");
    emulator.builtin_config_id = Some("retroarch".to_string());
    db.emulators().add(std::slice::from_ref(&emulator)).unwrap();

    let mut session = EditSession::open(&db, &catalog, &prompts).unwrap();
    let menu = session.begin_add_profile().unwrap().unwrap();

    assert_eq!(
        menu,
        vec![
            ProfileMenuEntry::BuiltIn("Default".to_string()),
            ProfileMenuEntry::BuiltIn("Fast".to_string()),
            ProfileMenuEntry::Custom,
        ]
    );

    session
        .apply_menu_entry(&ProfileMenuEntry::BuiltIn("Default".to_string()))
        .unwrap();
    let selected = session.selected_builtin_profile().unwrap();
    assert_eq!(selected.name, "Default");
    assert_eq!(selected.builtin_profile_name, "Default");
}

#[test]
fn test_no_key_appends_custom_profile_directly() {
    let db = Database::in_memory().unwrap();
    let catalog = test_catalog();
    let prompts = FakePrompts::answering(true);
    db.emulators().add(&[Emulator::new("Standalone")]).unwrap();

    let mut session = EditSession::open(&db, &catalog, &prompts).unwrap();
    let menu = session.begin_add_profile().unwrap();

    assert!(menu.is_none());
    let profile = session.selected_custom_profile().unwrap();
    assert_eq!(profile.name, "New Profile");
    assert_eq!(profile.working_directory, EMULATOR_DIR_VAR);
}

#[test]
fn test_unresolvable_key_aborts_menu_without_mutation() {
    let db = Database::in_memory().unwrap();
    let catalog = test_catalog();
    let prompts = FakePrompts::answering(true);
    let mut emulator = Emulator::new("Mystery");
    emulator.builtin_config_id = Some("gone".to_string());
    db.emulators().add(std::slice::from_ref(&emulator)).unwrap();

    let mut session = EditSession::open(&db, &catalog, &prompts).unwrap();
    let err = session.begin_add_profile().unwrap_err();

    assert!(matches!(err, SessionError::UnknownCatalogEntry(key) if key == "gone"));
    let emulator = session.selected_emulator().unwrap();
    assert!(emulator.builtin_profiles.is_empty());
    assert!(emulator.custom_profiles.is_empty());
}

#[test]
fn test_remove_selected_profile_clears_selection() {
    let db = Database::in_memory().unwrap();
    let catalog = test_catalog();
    let prompts = FakePrompts::answering(true);
    db.emulators()
        .add(&[emulator_with_profiles("Ares")])
        .unwrap();

    let mut session = EditSession::open(&db, &catalog, &prompts).unwrap();
    session.remove_profile(ProfileSlot::Custom(0)).unwrap();

    assert!(session.selected_profile().is_none());
    assert_eq!(session.selected_emulator().unwrap().custom_profiles.len(), 1);
}

// =============================================================================
// Executable picker
// =============================================================================

#[test]
fn test_picked_file_is_set_on_selected_custom_profile() {
    let db = Database::in_memory().unwrap();
    let catalog = test_catalog();
    let prompts = FakePrompts::with_file("/usr/bin/retroarch");
    db.emulators()
        .add(&[emulator_with_profiles("RetroArch")])
        .unwrap();

    let mut session = EditSession::open(&db, &catalog, &prompts).unwrap();
    assert!(session.set_profile_executable().unwrap());

    assert_eq!(
        session.selected_custom_profile().unwrap().executable.as_deref(),
        Some("/usr/bin/retroarch")
    );
}

#[test]
fn test_stale_profile_selection_is_not_a_panic() {
    let db = Database::in_memory().unwrap();
    let catalog = test_catalog();
    let prompts = FakePrompts::with_file("/usr/bin/retroarch");
    db.emulators()
        .add(&[emulator_with_profiles("RetroArch")])
        .unwrap();

    let mut session = EditSession::open(&db, &catalog, &prompts).unwrap();
    session.select_profile(Some(ProfileSlot::Custom(1)));
    session.selected_emulator_mut().unwrap().custom_profiles.clear();

    assert!(matches!(
        session.set_profile_executable(),
        Err(SessionError::NoProfileSelected)
    ));
}

#[test]
fn test_cancelled_picker_is_a_no_op() {
    let db = Database::in_memory().unwrap();
    let catalog = test_catalog();
    let prompts = FakePrompts::answering(true);
    db.emulators()
        .add(&[emulator_with_profiles("RetroArch")])
        .unwrap();

    let mut session = EditSession::open(&db, &catalog, &prompts).unwrap();
    assert!(!session.set_profile_executable().unwrap());
    assert!(session.selected_custom_profile().unwrap().executable.is_none());
}

// =============================================================================
// Import
// =============================================================================

fn import_candidate(accepted: bool) -> ImportCandidate {
    ImportCandidate {
        config_id: "retroarch".to_string(),
        name: "RetroArch".to_string(),
        install_dir: Some("/opt/retroarch".to_string()),
        profiles: vec![
            ImportProfile {
                name: "Default".to_string(),
                profile_name: "Default".to_string(),
                import: accepted,
            },
            ImportProfile {
                name: "Fast".to_string(),
                profile_name: "Fast".to_string(),
                import: false,
            },
        ],
    }
}

#[test]
fn test_import_maps_accepted_profiles_one_to_one() {
    let db = Database::in_memory().unwrap();
    let catalog = test_catalog();
    let prompts = FakePrompts::answering(true);

    let mut session = EditSession::open(&db, &catalog, &prompts).unwrap();
    let imported = session.import_candidates(&[import_candidate(true)]);

    assert_eq!(imported, 1);
    let emulator = &session.emulators()[0];
    assert_eq!(emulator.builtin_config_id.as_deref(), Some("retroarch"));
    assert_eq!(emulator.install_dir.as_deref(), Some("/opt/retroarch"));
    assert_eq!(emulator.builtin_profiles.len(), 1);
    assert_eq!(emulator.builtin_profiles[0].builtin_profile_name, "Default");
}

#[test]
fn test_import_skips_candidates_with_nothing_accepted() {
    let db = Database::in_memory().unwrap();
    let catalog = test_catalog();
    let prompts = FakePrompts::answering(true);

    let mut session = EditSession::open(&db, &catalog, &prompts).unwrap();
    assert_eq!(session.import_candidates(&[import_candidate(false)]), 0);
    assert_eq!(session.import_candidates(&[]), 0);
    assert!(session.emulators().is_empty());
}

#[test]
fn test_imported_emulators_get_fresh_identities() {
    let db = Database::in_memory().unwrap();
    let catalog = test_catalog();
    let prompts = FakePrompts::answering(true);

    let mut session = EditSession::open(&db, &catalog, &prompts).unwrap();
    session.import_candidates(&[import_candidate(true), import_candidate(true)]);

    assert_ne!(session.emulators()[0].id, session.emulators()[1].id);
}
