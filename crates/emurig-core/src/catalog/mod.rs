//! Read-only catalog of built-in emulator definitions
//!
//! The catalog describes which launch profiles an emulator known to the
//! project ships with. It is injected into the edit session so tests can
//! substitute an in-memory one.

pub mod loader;

use serde::{Deserialize, Serialize};

pub use loader::{load_catalog_dir, CatalogError};

/// A catalog definition of a known emulator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stable key referenced by `Emulator::builtin_config_id`
    pub id: String,
    /// Display name
    pub name: String,
    /// Names of the launch profiles this definition ships
    #[serde(default)]
    pub profiles: Vec<String>,
}

/// Resolver for built-in emulator definitions
pub trait EmulatorCatalog {
    /// Look up a definition by key; `None` for unknown keys
    fn resolve(&self, key: &str) -> Option<&CatalogEntry>;

    /// All known definitions
    fn entries(&self) -> &[CatalogEntry];
}

/// In-memory catalog
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entries: Vec<CatalogEntry>,
}

impl StaticCatalog {
    #[must_use]
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }
}

impl EmulatorCatalog for StaticCatalog {
    fn resolve(&self, key: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == key)
    }

    fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
}
