//! State-file persistence gateway.
//!
//! # Responsibility
//! - Resolve the per-user location of the goal state file.
//! - Read and overwrite the state file without exposing partial writes.
//!
//! # Invariants
//! - A missing state file reads as `None`, never as an error.
//! - Writes replace the file atomically (temp sibling + rename), so a
//!   concurrent reader never observes a half-written document.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod paths;
pub mod state_file;

pub use paths::{ensure_parent_dir, resolve_state_path};
pub use state_file::{JsonStateFile, MemoryStateFile, StateGateway};

pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence gateway failures.
#[derive(Debug)]
pub enum StorageError {
    /// The per-user data directory cannot be resolved or created.
    Unavailable(String),
    /// The state file exists but could not be read.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The state file could not be (atomically) overwritten.
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
            Self::Read { path, source } => {
                write!(f, "failed to read state file `{}`: {source}", path.display())
            }
            Self::Write { path, source } => write!(
                f,
                "failed to write state file `{}`: {source}",
                path.display()
            ),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unavailable(_) => None,
            Self::Read { source, .. } | Self::Write { source, .. } => Some(source),
        }
    }
}
