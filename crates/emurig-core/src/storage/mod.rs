//! Storage layer (`SQLite`, keyed collections, buffered updates)

pub mod db;
pub mod keyed;
pub mod migrations;
pub mod references;

pub use db::{BufferedUpdate, ChangeEvent, ChangeKind, Database, StorageError};
pub use keyed::{KeyedTable, StoreEntity};
pub use references::ReferenceIndex;
