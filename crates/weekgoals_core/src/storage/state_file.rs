//! State gateway contract and implementations.
//!
//! # Responsibility
//! - Define the byte-level read/write contract the goal store persists
//!   through.
//! - Provide the on-disk JSON file gateway and an in-memory test double.
//!
//! # Invariants
//! - `read` reports a missing file as `Ok(None)`.
//! - `write` replaces the whole file via a temp sibling and rename; a
//!   partially-written file is never observable under the final path.

use super::paths::ensure_parent_dir;
use super::{StorageError, StorageResult};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

/// Byte-level persistence contract for the goal state document.
pub trait StateGateway: Send + Sync {
    /// Returns the full file contents, or `None` when no file exists yet.
    fn read(&self) -> StorageResult<Option<Vec<u8>>>;

    /// Overwrites the full file contents.
    fn write(&self, bytes: &[u8]) -> StorageResult<()>;
}

/// On-disk gateway bound to a single JSON state file.
pub struct JsonStateFile {
    path: PathBuf,
}

impl JsonStateFile {
    /// Creates a gateway for an explicit state file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a gateway at the per-user default location, creating the
    /// containing directory if needed.
    pub fn at_default_location() -> StorageResult<Self> {
        let path = super::resolve_state_path()?;
        ensure_parent_dir(&path)?;
        Ok(Self::new(path))
    }

    /// Bound state file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateGateway for JsonStateFile {
    fn read(&self) -> StorageResult<Option<Vec<u8>>> {
        match std::fs::read(&self.path) {
            Ok(bytes) => {
                info!(
                    "event=state_read module=storage status=ok bytes={}",
                    bytes.len()
                );
                Ok(Some(bytes))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!("event=state_read module=storage status=not_found");
                Ok(None)
            }
            Err(source) => {
                error!(
                    "event=state_read module=storage status=error error_code=state_read_failed error={source}"
                );
                Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        }
    }

    fn write(&self, bytes: &[u8]) -> StorageResult<()> {
        let started_at = Instant::now();
        ensure_parent_dir(&self.path)?;

        // Temp sibling in the same directory keeps the rename atomic.
        let tmp = self.path.with_extension("json.tmp");
        let result = std::fs::write(&tmp, bytes)
            .and_then(|()| std::fs::rename(&tmp, &self.path))
            .map_err(|source| StorageError::Write {
                path: self.path.clone(),
                source,
            });

        match &result {
            Ok(()) => info!(
                "event=state_write module=storage status=ok bytes={} duration_ms={}",
                bytes.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=state_write module=storage status=error error_code=state_write_failed duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            ),
        }
        result
    }
}

/// In-memory gateway for tests and previews.
///
/// Clones share one buffer, so a test can keep a handle to inspect what the
/// store persisted.
#[derive(Clone, Default)]
pub struct MemoryStateFile {
    contents: Arc<Mutex<Option<Vec<u8>>>>,
}

impl MemoryStateFile {
    /// Creates an empty gateway (no state file yet).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gateway pre-seeded with file contents.
    pub fn with_contents(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            contents: Arc::new(Mutex::new(Some(bytes.into()))),
        }
    }

    /// Returns a copy of the current contents, `None` when never written.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.contents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl StateGateway for MemoryStateFile {
    fn read(&self) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.contents())
    }

    fn write(&self, bytes: &[u8]) -> StorageResult<()> {
        *self
            .contents
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(bytes.to_vec());
        Ok(())
    }
}
