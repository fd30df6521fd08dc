//! Generic keyed collection over a database table
//!
//! Entities are stored one row per entity, full state as a JSON blob in the
//! data column, keyed by their unique id.

use std::marker::PhantomData;

use rusqlite::params;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::model::{Emulator, ScannerConfig};

use super::db::{ChangeEvent, ChangeKind, Database, StorageError};

/// An entity storable in a keyed collection
///
/// `PartialEq` must be structural over every field so the reconciliation
/// engine can skip unchanged updates.
pub trait StoreEntity: Clone + PartialEq + Serialize + DeserializeOwned {
    /// Table backing this collection
    const TABLE: &'static str;

    /// Unique identifier within the collection
    fn id(&self) -> Uuid;

    /// Display name, kept in its own column for ordering
    fn name(&self) -> &str;
}

impl StoreEntity for Emulator {
    const TABLE: &'static str = "emulators";

    fn id(&self) -> Uuid {
        self.id.as_uuid()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl StoreEntity for ScannerConfig {
    const TABLE: &'static str = "scanners";

    fn id(&self) -> Uuid {
        self.id.as_uuid()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Keyed collection of one entity type
pub struct KeyedTable<'a, T> {
    db: &'a Database,
    _entity: PhantomData<T>,
}

impl Database {
    /// Keyed collection for any entity type
    #[must_use]
    pub fn table<T: StoreEntity>(&self) -> KeyedTable<'_, T> {
        KeyedTable {
            db: self,
            _entity: PhantomData,
        }
    }

    /// Keyed collection of emulator configurations
    #[must_use]
    pub fn emulators(&self) -> KeyedTable<'_, Emulator> {
        self.table()
    }

    /// Keyed collection of scanner configurations
    #[must_use]
    pub fn scanners(&self) -> KeyedTable<'_, ScannerConfig> {
        self.table()
    }
}

impl<T: StoreEntity> KeyedTable<'_, T> {
    /// Look up an entity by id
    ///
    /// # Errors
    /// Returns an error if the query or deserialization fails.
    pub fn lookup(&self, id: Uuid) -> Result<Option<T>, StorageError> {
        let sql = format!("SELECT data FROM {} WHERE id = ?1", T::TABLE);
        let mut stmt = self.db.connection().prepare(&sql)?;

        let result = stmt.query_row(params![id.to_string()], |row| {
            let json: String = row.get(0)?;
            Ok(json)
        });

        match result {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all entities, ordered by name
    ///
    /// # Errors
    /// Returns an error if the query or deserialization fails.
    pub fn list(&self) -> Result<Vec<T>, StorageError> {
        let sql = format!("SELECT data FROM {} ORDER BY name", T::TABLE);
        let mut stmt = self.db.connection().prepare(&sql)?;

        let rows = stmt.query_map([], |row| {
            let json: String = row.get(0)?;
            Ok(json)
        })?;

        let mut entities = Vec::new();
        for row in rows {
            entities.push(serde_json::from_str(&row?)?);
        }
        Ok(entities)
    }

    /// Add a batch of entities
    ///
    /// # Errors
    /// Returns an error if any insert fails.
    pub fn add(&self, entities: &[T]) -> Result<(), StorageError> {
        let sql = format!(
            "INSERT INTO {} (id, name, data) VALUES (?1, ?2, ?3)",
            T::TABLE
        );
        for entity in entities {
            let json = serde_json::to_string(entity)?;
            self.db
                .connection()
                .execute(&sql, params![entity.id().to_string(), entity.name(), json])?;
            self.db.record(ChangeEvent {
                collection: T::TABLE,
                kind: ChangeKind::Added,
                id: entity.id(),
            });
        }
        Ok(())
    }

    /// Remove a batch of entities
    ///
    /// Rows already absent are skipped silently.
    ///
    /// # Errors
    /// Returns an error if any delete fails.
    pub fn remove(&self, entities: &[T]) -> Result<(), StorageError> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", T::TABLE);
        for entity in entities {
            let deleted = self
                .db
                .connection()
                .execute(&sql, params![entity.id().to_string()])?;
            if deleted > 0 {
                self.db.record(ChangeEvent {
                    collection: T::TABLE,
                    kind: ChangeKind::Removed,
                    id: entity.id(),
                });
            }
        }
        Ok(())
    }

    /// Update an entity in place
    ///
    /// # Errors
    /// Returns an error if the entity does not exist or the update fails.
    pub fn update(&self, entity: &T) -> Result<(), StorageError> {
        let sql = format!("UPDATE {} SET name = ?1, data = ?2 WHERE id = ?3", T::TABLE);
        let json = serde_json::to_string(entity)?;
        let updated = self
            .db
            .connection()
            .execute(&sql, params![entity.name(), json, entity.id().to_string()])?;

        if updated == 0 {
            return Err(StorageError::NotFound {
                table: T::TABLE,
                id: entity.id(),
            });
        }

        self.db.record(ChangeEvent {
            collection: T::TABLE,
            kind: ChangeKind::Updated,
            id: entity.id(),
        });
        Ok(())
    }
}
