//! Entity types managed by the engine

pub mod emulator;
pub mod ids;
pub mod scanner;

pub use emulator::{
    BuiltinProfile, CustomProfile, Emulator, EmulatorProfile, COPY_SUFFIX, CUSTOM_PROFILE_PREFIX,
    EMULATOR_DIR_VAR,
};
pub use ids::{EmulatorId, ScannerId};
pub use scanner::ScannerConfig;
