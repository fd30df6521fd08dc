//! Database migrations

use rusqlite::Connection;

use super::db::StorageError;

const CURRENT_VERSION: i32 = 1;

/// Run all pending migrations
///
/// # Errors
/// Returns an error if migrations fail
pub fn run_migrations(conn: &Connection) -> Result<(), StorageError> {
    let version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if version < 1 {
        migrate_v1(conn)?;
    }

    conn.pragma_update(None, "user_version", CURRENT_VERSION)?;
    Ok(())
}

fn migrate_v1(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        r"
        -- Emulator configurations
        -- Full entity state as JSON blob in data column
        CREATE TABLE IF NOT EXISTS emulators (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            data TEXT NOT NULL
        );

        -- Rom scanner configurations
        CREATE TABLE IF NOT EXISTS scanners (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            data TEXT NOT NULL
        );

        -- Game launch actions referencing emulators
        -- Owned by an external producer; the engine only counts rows here
        -- before allowing an emulator removal
        CREATE TABLE IF NOT EXISTS game_actions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            game_name TEXT NOT NULL,
            action_type TEXT NOT NULL,
            emulator_id TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_game_actions_emulator
            ON game_actions(emulator_id);
        ",
    )?;

    Ok(())
}
