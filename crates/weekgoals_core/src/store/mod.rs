//! Goal store use-case layer.
//!
//! # Responsibility
//! - Own the single authoritative in-memory goal list.
//! - Expose the mutation and load operations consumed by view and tray.
//!
//! # Invariants
//! - Next-state is always computed from the last committed state.
//! - Persistence succeeds before an operation commits or reports success.

use crate::migrate::MigrateError;
use crate::model::goal::GoalValidationError;
use crate::storage::StorageError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod goal_store;

pub use goal_store::GoalStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Underlying failure carried by a load or save error.
#[derive(Debug)]
pub enum StateError {
    Storage(StorageError),
    Migrate(MigrateError),
    Serialize(serde_json::Error),
}

impl Display for StateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Migrate(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize goal state: {err}"),
        }
    }
}

impl Error for StateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Migrate(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<StorageError> for StateError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<MigrateError> for StateError {
    fn from(value: MigrateError) -> Self {
        Self::Migrate(value)
    }
}

impl From<serde_json::Error> for StateError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Operation-boundary errors surfaced by the goal store.
#[derive(Debug)]
pub enum StoreError {
    /// `load` failed; in-memory state is unchanged.
    Load(StateError),
    /// A mutator failed to persist; the previously committed state is
    /// untouched and the same call may be retried.
    Save(StateError),
    /// Input rejected before any state was touched.
    Validation(GoalValidationError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(err) => write!(f, "loading goal state failed: {err}"),
            Self::Save(err) => write!(f, "saving goal state failed: {err}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Load(err) | Self::Save(err) => Some(err),
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<GoalValidationError> for StoreError {
    fn from(value: GoalValidationError) -> Self {
        Self::Validation(value)
    }
}
