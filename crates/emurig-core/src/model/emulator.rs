//! Emulator configuration types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ids::EmulatorId;

/// Prefix distinguishing custom profile ids from built-in entries when both
/// appear in one selectable list.
pub const CUSTOM_PROFILE_PREFIX: &str = "#custom_";

/// Path variable expanded by launchers to the emulator's install directory.
pub const EMULATOR_DIR_VAR: &str = "{EmulatorDir}";

/// Name suffix applied when duplicating an entity or profile.
pub const COPY_SUFFIX: &str = " Copy";

/// An emulator configuration
///
/// `builtin_profiles` only makes sense when `builtin_config_id` refers to a
/// catalog definition; already-added instances survive a key change, only the
/// candidate list offered for new ones is re-derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emulator {
    /// Unique identifier
    pub id: EmulatorId,
    /// Display name
    pub name: String,
    /// Catalog definition this emulator is based on, if any
    #[serde(default)]
    pub builtin_config_id: Option<String>,
    /// Install directory, used to expand `{EmulatorDir}`
    #[serde(default)]
    pub install_dir: Option<String>,
    /// Profiles referencing catalog-defined launch configurations
    #[serde(default)]
    pub builtin_profiles: Vec<BuiltinProfile>,
    /// Fully user-defined profiles
    #[serde(default)]
    pub custom_profiles: Vec<CustomProfile>,
}

impl Emulator {
    /// Create a new emulator with the given name and no profiles
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EmulatorId::new(),
            name: name.into(),
            builtin_config_id: None,
            install_dir: None,
            builtin_profiles: Vec::new(),
            custom_profiles: Vec::new(),
        }
    }

    /// Deep copy with fresh identities
    ///
    /// The copy gets a new emulator id and every custom profile a new
    /// prefixed id; built-in profiles carry no identity of their own and are
    /// copied verbatim. The name is suffixed to keep list entries apart.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.id = EmulatorId::new();
        copy.name.push_str(COPY_SUFFIX);
        for profile in &mut copy.custom_profiles {
            profile.id = CustomProfile::fresh_id();
        }
        copy
    }
}

/// A profile referencing a launch configuration defined by the catalog
///
/// Identified positionally within its parent; no independent identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltinProfile {
    /// Display name
    pub name: String,
    /// Catalog-defined profile name this entry resolves to
    pub builtin_profile_name: String,
}

/// A fully user-defined launch profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomProfile {
    /// Prefixed identifier, distinct from emulator ids
    pub id: String,
    /// Display name
    pub name: String,
    /// Executable path, may contain path variables
    #[serde(default)]
    pub executable: Option<String>,
    /// Working directory, defaults to the emulator's install directory
    pub working_directory: String,
    /// Launch arguments
    #[serde(default)]
    pub arguments: Option<String>,
}

impl CustomProfile {
    /// Create a blank profile with a fresh id and the default working
    /// directory
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Self::fresh_id(),
            name: "New Profile".to_string(),
            executable: None,
            working_directory: EMULATOR_DIR_VAR.to_string(),
            arguments: None,
        }
    }

    /// Generate a fresh prefixed profile id
    #[must_use]
    pub fn fresh_id() -> String {
        format!("{}{}", CUSTOM_PROFILE_PREFIX, Uuid::new_v4())
    }

    /// Deep copy with a fresh id and suffixed name
    #[must_use]
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.id = Self::fresh_id();
        copy.name.push_str(COPY_SUFFIX);
        copy
    }
}

impl Default for CustomProfile {
    fn default() -> Self {
        Self::new()
    }
}

/// Either profile variant, for places that handle both uniformly
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmulatorProfile<'a> {
    BuiltIn(&'a BuiltinProfile),
    Custom(&'a CustomProfile),
}

impl EmulatorProfile<'_> {
    /// Display name of the profile
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::BuiltIn(p) => &p.name,
            Self::Custom(p) => &p.name,
        }
    }
}
