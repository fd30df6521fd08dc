//! User prompt collaborators
//!
//! Both prompts are synchronous call-and-returns; the engine performs no
//! work while one is outstanding. Injected so tests can script answers.

use std::path::PathBuf;

/// Blocking user prompts
pub trait Prompts {
    /// Ask a yes/no question
    fn confirm(&self, message: &str) -> bool;

    /// Ask for a file path; `None` when the user made no selection
    fn select_file(&self) -> Option<PathBuf>;
}
