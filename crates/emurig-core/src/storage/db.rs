//! Database connection, change events, and the buffered update scope

use std::cell::{Cell, RefCell};
use std::path::Path;

use rusqlite::Connection;
use thiserror::Error;
use uuid::Uuid;

use super::migrations;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{table} entry not found: {id}")]
    NotFound { table: &'static str, id: Uuid },

    #[error("A buffered update scope is already active")]
    ScopeActive,
}

/// Kind of change applied to a keyed collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Removed,
    Updated,
}

/// A change to one entity of a keyed collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Table name of the collection
    pub collection: &'static str,
    pub kind: ChangeKind,
    pub id: Uuid,
}

type Observer = Box<dyn Fn(&[ChangeEvent])>;

/// Database wrapper
///
/// Holds the connection plus the change-notification machinery. Mutations go
/// through [`super::KeyedTable`]; observers receive one event per entity, or
/// one batch per [`BufferedUpdate`] scope.
pub struct Database {
    conn: Connection,
    observers: RefCell<Vec<Observer>>,
    buffer: RefCell<Vec<ChangeEvent>>,
    buffering: Cell<bool>,
}

impl Database {
    /// Open or create a database at the given path
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        // WAL mode for better concurrent read/write performance
        conn.pragma_update(None, "journal_mode", "WAL")?;
        // NORMAL synchronous is safe with WAL and faster than FULL
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        migrations::run_migrations(&conn)?;

        Ok(Self::from_conn(conn))
    }

    /// Create an in-memory database (for testing)
    ///
    /// # Errors
    /// Returns an error if the database cannot be created.
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        migrations::run_migrations(&conn)?;
        Ok(Self::from_conn(conn))
    }

    fn from_conn(conn: Connection) -> Self {
        Self {
            conn,
            observers: RefCell::new(Vec::new()),
            buffer: RefCell::new(Vec::new()),
            buffering: Cell::new(false),
        }
    }

    /// Get a reference to the connection
    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Register a change observer
    pub fn observe(&self, observer: impl Fn(&[ChangeEvent]) + 'static) {
        self.observers.borrow_mut().push(Box::new(observer));
    }

    /// Begin a buffered update scope
    ///
    /// The scope wraps enclosed mutations in one transaction and defers
    /// change notifications until [`BufferedUpdate::commit`], so observers
    /// see the whole scope as a single batch. Dropping the guard without
    /// committing rolls the transaction back and discards buffered events.
    ///
    /// # Errors
    /// Returns an error if a scope is already active or the transaction
    /// cannot be started.
    pub fn buffered_update(&self) -> Result<BufferedUpdate<'_>, StorageError> {
        if self.buffering.get() {
            return Err(StorageError::ScopeActive);
        }
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        self.buffering.set(true);
        Ok(BufferedUpdate {
            db: self,
            done: false,
        })
    }

    pub(crate) fn record(&self, event: ChangeEvent) {
        if self.buffering.get() {
            self.buffer.borrow_mut().push(event);
        } else {
            self.notify(&[event]);
        }
    }

    fn notify(&self, events: &[ChangeEvent]) {
        if events.is_empty() {
            return;
        }
        for observer in self.observers.borrow().iter() {
            observer(events);
        }
    }
}

/// Guard for a buffered update scope
///
/// Must be committed explicitly; drop rolls back.
pub struct BufferedUpdate<'a> {
    db: &'a Database,
    done: bool,
}

impl std::fmt::Debug for BufferedUpdate<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferedUpdate")
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl BufferedUpdate<'_> {
    /// Commit the transaction and flush buffered events as one batch
    ///
    /// # Errors
    /// Returns an error if the commit fails; the drop handler then rolls
    /// back.
    pub fn commit(mut self) -> Result<(), StorageError> {
        self.db.conn.execute_batch("COMMIT")?;
        self.done = true;
        self.db.buffering.set(false);
        let events = self.db.buffer.take();
        self.db.notify(&events);
        Ok(())
    }
}

impl Drop for BufferedUpdate<'_> {
    fn drop(&mut self) {
        if !self.done {
            // Release unconditionally on every exit path
            let _ = self.db.conn.execute_batch("ROLLBACK");
            self.db.buffering.set(false);
            self.db.buffer.borrow_mut().clear();
        }
    }
}
