//! Tray-menu synchronization contract.
//!
//! # Responsibility
//! - Define the read-only projection pushed to the OS tray surface after
//!   every committed mutation.
//! - Route inbound tray action events to store operations.
//!
//! # Invariants
//! - The projection is a mirror; presenters never mutate goal state through
//!   it.
//! - Presenter failures are reported but never roll back a committed
//!   mutation.

use crate::model::goal::{Goal, GoalId, Priority};
use crate::storage::StateGateway;
use crate::store::{GoalStore, StoreResult};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Read-only mirror of one goal, rendered as a tray menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalProjection {
    pub id: GoalId,
    pub title: String,
    pub completed: bool,
    pub impediments: Option<String>,
    pub priority: Priority,
}

impl From<&Goal> for GoalProjection {
    fn from(goal: &Goal) -> Self {
        Self {
            id: goal.id,
            title: goal.title.clone(),
            completed: goal.completed,
            impediments: goal.impediments.clone(),
            priority: goal.priority,
        }
    }
}

/// Projects the committed goal list for tray presentation.
pub fn project(goals: &[Goal]) -> Vec<GoalProjection> {
    goals.iter().map(GoalProjection::from).collect()
}

/// Failure reported by a tray presenter.
///
/// Kept as a message envelope: the store only logs it, callers decide how
/// to surface it to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrayError {
    pub message: String,
}

impl TrayError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for TrayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "tray presenter failed: {}", self.message)
    }
}

impl Error for TrayError {}

/// External tray/menu surface mirroring the goal list.
pub trait TrayPresenter: Send + Sync {
    /// Replaces the presented menu entries with the given projection.
    fn present(&self, goals: &[GoalProjection]) -> Result<(), TrayError>;
}

/// Action event emitted by the tray surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayEvent {
    /// Flip completion on the goal.
    ToggleGoal(GoalId),
    /// Clear the goal's impediment note.
    RemoveImpediment(GoalId),
    /// Start the add-impediment flow; the view collects the text.
    AddImpediment(GoalId),
}

/// Outcome of routing one tray event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayDispatch {
    /// The store operation ran to completion.
    Applied,
    /// The view must prompt for impediment text, then call
    /// `GoalStore::set_impediment`.
    ImpedimentPromptRequested(GoalId),
}

/// Routes one inbound tray event to the corresponding store operation.
pub fn dispatch_event<G: StateGateway>(
    store: &GoalStore<G>,
    event: TrayEvent,
) -> StoreResult<TrayDispatch> {
    match event {
        TrayEvent::ToggleGoal(id) => {
            store.toggle(id)?;
            Ok(TrayDispatch::Applied)
        }
        TrayEvent::RemoveImpediment(id) => {
            store.set_impediment(id, None)?;
            Ok(TrayDispatch::Applied)
        }
        TrayEvent::AddImpediment(id) => Ok(TrayDispatch::ImpedimentPromptRequested(id)),
    }
}
