//! Content loaders for reading tracker data from files.
//!
//! Every loader has a `load(path)` entry point and a `parse(str)` twin used by
//! tests and by callers that already hold the text.

pub mod catalog;
pub mod config;
pub mod script;

pub use catalog::CatalogLoader;
pub use config::ConfigLoader;
pub use script::{EncounterScript, ScriptLoader, ScriptRoster, ScriptStep, StepAction};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
