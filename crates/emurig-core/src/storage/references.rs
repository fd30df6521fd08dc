//! Read-only view over game actions referencing emulators
//!
//! The game library itself is owned by an external producer. The edit
//! session only needs to know how many launch actions point at an emulator
//! before letting the user remove it.

use rusqlite::params;

use crate::model::EmulatorId;

use super::db::{Database, StorageError};

/// Action type value for emulator launch actions
const EMULATOR_ACTION: &str = "emulator";

/// Queryable index of emulator references held by game actions
pub struct ReferenceIndex<'a> {
    db: &'a Database,
}

impl Database {
    /// Reference index over game actions
    #[must_use]
    pub fn references(&self) -> ReferenceIndex<'_> {
        ReferenceIndex { db: self }
    }
}

impl ReferenceIndex<'_> {
    /// Count game actions of emulator kind pointing at the given emulator
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn emulator_reference_count(&self, id: EmulatorId) -> Result<usize, StorageError> {
        let count: i64 = self.db.connection().query_row(
            "SELECT COUNT(*) FROM game_actions WHERE emulator_id = ?1 AND action_type = ?2",
            params![id.to_string(), EMULATOR_ACTION],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Record a game action referencing an emulator
    ///
    /// Exists for the external producer side (and fixtures); the engine
    /// itself only reads.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn add_reference(&self, game_name: &str, id: EmulatorId) -> Result<(), StorageError> {
        self.db.connection().execute(
            "INSERT INTO game_actions (game_name, action_type, emulator_id) VALUES (?1, ?2, ?3)",
            params![game_name, EMULATOR_ACTION, id.to_string()],
        )?;
        Ok(())
    }
}
