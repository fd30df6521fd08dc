//! Rom scanner configuration

use serde::{Deserialize, Serialize};

use super::ids::ScannerId;

/// A rom scanner configuration
///
/// Reconciled the same way as emulators but never part of the selection
/// cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Unique identifier
    pub id: ScannerId,
    /// Display name
    pub name: String,
}

impl ScannerConfig {
    /// Create a new scanner config with the given name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ScannerId::new(),
            name: name.into(),
        }
    }
}
