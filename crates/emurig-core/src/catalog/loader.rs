//! Catalog loading from definition files

use std::fs;
use std::path::Path;

use thiserror::Error;

use super::{CatalogEntry, StaticCatalog};

/// Errors while loading catalog definitions
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid definition file {path}: {source}")]
    InvalidDefinition {
        path: String,
        source: serde_json::Error,
    },
}

/// Load all `*.json` definition files from a directory into a catalog
///
/// A missing directory yields an empty catalog; definitions are sorted by
/// name for stable enumeration.
///
/// # Errors
/// Returns an error if a definition file cannot be read or parsed.
pub fn load_catalog_dir(dir: &Path) -> Result<StaticCatalog, CatalogError> {
    let mut entries = Vec::new();
    if !dir.is_dir() {
        return Ok(StaticCatalog::new(entries));
    }

    for file in fs::read_dir(dir)? {
        let path = file?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }

        let json = fs::read_to_string(&path)?;
        let entry: CatalogEntry =
            serde_json::from_str(&json).map_err(|source| CatalogError::InvalidDefinition {
                path: path.display().to_string(),
                source,
            })?;
        entries.push(entry);
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(StaticCatalog::new(entries))
}
