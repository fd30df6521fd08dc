//! emurig core - staged-edit engine and storage
//!
//! This crate provides the emulator/scanner data model, the `SQLite`-backed
//! keyed collections with buffered update scopes, the reconciliation engine,
//! and the staged-edit session with its selection cascade.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod catalog;
pub mod model;
pub mod prompts;
pub mod reconcile;
pub mod session;
pub mod storage;

pub use catalog::{CatalogEntry, EmulatorCatalog, StaticCatalog};
pub use model::{Emulator, ScannerConfig};
pub use prompts::Prompts;
pub use reconcile::{ReconcilePlan, ReconcileReport};
pub use session::EditSession;
pub use storage::Database;
