//! State-file location resolution.
//!
//! # Responsibility
//! - Map the OS per-user application-data directory to the goal state file.
//! - Create the containing directory on first run.
//!
//! # Invariants
//! - The resolved path is deterministic for a given user and platform.
//! - `ensure_parent_dir` is idempotent.

use super::{StorageError, StorageResult};
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "weekgoals";
const STATE_FILE_NAME: &str = "goals.json";

/// Resolves the per-user goal state file path.
///
/// # Errors
/// - `StorageError::Unavailable` when the OS application-data directory
///   cannot be determined.
pub fn resolve_state_path() -> StorageResult<PathBuf> {
    let base = dirs::data_dir().ok_or_else(|| {
        StorageError::Unavailable(
            "user application data directory could not be determined".to_string(),
        )
    })?;
    Ok(base.join(APP_DIR_NAME).join(STATE_FILE_NAME))
}

/// Creates the parent directory of `path`, including missing ancestors.
///
/// # Errors
/// - `StorageError::Unavailable` on permission or I/O failure.
pub fn ensure_parent_dir(path: &Path) -> StorageResult<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    std::fs::create_dir_all(parent).map_err(|source| {
        StorageError::Unavailable(format!(
            "failed to create state directory `{}`: {source}",
            parent.display()
        ))
    })
}
