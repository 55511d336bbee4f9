//! Core domain logic for WeekGoals.
//! This crate is the single source of truth for goal-state invariants.

pub mod logging;
pub mod migrate;
pub mod model;
pub mod storage;
pub mod store;
pub mod tray;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::goal::{normalize_impediment, Goal, GoalId, GoalValidationError, Priority};
pub use storage::{
    resolve_state_path, JsonStateFile, MemoryStateFile, StateGateway, StorageError,
};
pub use store::{GoalStore, StateError, StoreError, StoreResult};
pub use tray::{
    dispatch_event, GoalProjection, TrayDispatch, TrayError, TrayEvent, TrayPresenter,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
