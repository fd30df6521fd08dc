//! Import candidate descriptors
//!
//! Produced by a peer collaborator (an installed-emulator scan or a file);
//! accepted candidates are translated into fresh working-copy emulators.

use serde::{Deserialize, Serialize};

/// One importable profile of a candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportProfile {
    /// Display name for the new built-in profile
    pub name: String,
    /// Catalog profile name it maps to
    pub profile_name: String,
    /// Whether the user accepted this profile
    #[serde(default)]
    pub import: bool,
}

/// A candidate emulator offered for import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportCandidate {
    /// Catalog definition key of the detected emulator
    pub config_id: String,
    /// Display name
    pub name: String,
    /// Detected install directory
    #[serde(default)]
    pub install_dir: Option<String>,
    /// Profiles offered for import
    #[serde(default)]
    pub profiles: Vec<ImportProfile>,
}
