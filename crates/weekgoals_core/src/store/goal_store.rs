//! Authoritative in-memory goal store.
//!
//! # Responsibility
//! - Run every mutation as a compute -> persist -> commit sequence.
//! - Load, migrate, and rewrite persisted state on startup.
//! - Push the committed list to subscribed tray presenters.
//!
//! # Invariants
//! - The state mutex is held across each operation's whole
//!   read-compute-persist-commit sequence, so overlapping callers are
//!   serialized and next-state is always derived from committed state.
//! - A failed persist leaves the committed in-memory list untouched.
//! - Presenters are notified only after a successful commit; their failure
//!   is logged, never propagated into the operation result.

use crate::migrate::{decode_goals, parse_records, run_migrations};
use crate::model::goal::{Goal, GoalId, Priority};
use crate::storage::StateGateway;
use crate::store::{StateError, StoreError, StoreResult};
use crate::tray::{project, GoalProjection, TrayPresenter};
use log::{error, info};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Single-owner goal store over a state gateway.
pub struct GoalStore<G: StateGateway> {
    gateway: G,
    goals: Mutex<Vec<Goal>>,
    presenters: Mutex<Vec<Arc<dyn TrayPresenter>>>,
}

impl<G: StateGateway> GoalStore<G> {
    /// Creates an empty store; call [`GoalStore::load`] to hydrate it.
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            goals: Mutex::new(Vec::new()),
            presenters: Mutex::new(Vec::new()),
        }
    }

    /// Subscribes a tray presenter to committed-state updates.
    pub fn subscribe(&self, presenter: Arc<dyn TrayPresenter>) {
        self.presenters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(presenter);
    }

    /// Snapshot of the committed goal list.
    pub fn goals(&self) -> Vec<Goal> {
        self.lock_goals().clone()
    }

    /// Loads persisted state into memory.
    ///
    /// Creates an empty state file on first run. When a migration altered
    /// any record, the migrated records are rewritten immediately so later
    /// loads start from the canonical shape.
    ///
    /// # Errors
    /// - `StoreError::Load` wrapping the storage or migration failure; the
    ///   in-memory list keeps its prior value.
    pub fn load(&self) -> StoreResult<()> {
        let mut goals = self.lock_goals();

        let loaded = match self.gateway.read().map_err(load_error)? {
            None => {
                self.persist(&[]).map_err(StoreError::Load)?;
                info!("event=state_load module=store status=ok mode=created count=0");
                Vec::new()
            }
            Some(bytes) => {
                let mut records = parse_records(&bytes).map_err(load_error)?;
                let changed = run_migrations(&mut records);
                let decoded = decode_goals(&records).map_err(load_error)?;

                if changed {
                    let bytes = serde_json::to_vec_pretty(&records)
                        .map_err(|err| StoreError::Load(StateError::Serialize(err)))?;
                    self.gateway
                        .write(&bytes)
                        .map_err(load_error)?;
                }

                info!(
                    "event=state_load module=store status=ok mode=read count={} migrated={changed}",
                    decoded.len()
                );
                decoded
            }
        };

        *goals = loaded;
        let snapshot = project(&goals);
        drop(goals);
        self.notify(&snapshot);
        Ok(())
    }

    /// Adds a new goal and returns its id.
    ///
    /// # Errors
    /// - `StoreError::Validation` for an empty title (state untouched).
    /// - `StoreError::Save` on persistence failure (state untouched).
    pub fn add(&self, title: &str, priority: Priority) -> StoreResult<GoalId> {
        let goal = Goal::new(title.trim(), priority);
        goal.validate()?;
        let id = goal.id;

        let goals = self.lock_goals();
        let mut next = goals.clone();
        next.push(goal);
        self.commit(goals, next, "goal_add")?;
        Ok(id)
    }

    /// Flips completion on the matching goal; unknown ids are a no-op.
    pub fn toggle(&self, id: GoalId) -> StoreResult<()> {
        self.mutate("goal_toggle", |goals| {
            for goal in goals.iter_mut() {
                if goal.id == id {
                    goal.toggle();
                }
            }
        })
    }

    /// Removes the matching goal; unknown ids are a no-op.
    pub fn remove(&self, id: GoalId) -> StoreResult<()> {
        self.mutate("goal_remove", |goals| {
            goals.retain(|goal| goal.id != id);
        })
    }

    /// Empties the whole list.
    pub fn clear(&self) -> StoreResult<()> {
        self.mutate("goal_clear", Vec::clear)
    }

    /// Sets or clears the impediment note on the matching goal.
    ///
    /// Empty and whitespace-only text clears the note, matching the absent
    /// representation on disk. Unknown ids are a no-op.
    pub fn set_impediment(&self, id: GoalId, note: Option<&str>) -> StoreResult<()> {
        self.mutate("goal_set_impediment", |goals| {
            for goal in goals.iter_mut() {
                if goal.id == id {
                    goal.set_impediment(note);
                }
            }
        })
    }

    /// Replaces priority on the matching goal; unknown ids are a no-op.
    pub fn set_priority(&self, id: GoalId, priority: Priority) -> StoreResult<()> {
        self.mutate("goal_set_priority", |goals| {
            for goal in goals.iter_mut() {
                if goal.id == id {
                    goal.set_priority(priority);
                }
            }
        })
    }

    fn mutate(&self, op: &'static str, apply: impl FnOnce(&mut Vec<Goal>)) -> StoreResult<()> {
        let goals = self.lock_goals();
        let mut next = goals.clone();
        apply(&mut next);
        self.commit(goals, next, op)
    }

    /// Persists `next` and only then replaces the committed list.
    fn commit(
        &self,
        mut goals: MutexGuard<'_, Vec<Goal>>,
        next: Vec<Goal>,
        op: &'static str,
    ) -> StoreResult<()> {
        if let Err(err) = self.persist(&next) {
            error!("event={op} module=store status=error error={err}");
            return Err(StoreError::Save(err));
        }

        *goals = next;
        info!("event={op} module=store status=ok count={}", goals.len());

        let snapshot = project(&goals);
        drop(goals);
        self.notify(&snapshot);
        Ok(())
    }

    fn persist(&self, goals: &[Goal]) -> Result<(), StateError> {
        let bytes = serde_json::to_vec_pretty(goals)?;
        self.gateway.write(&bytes)?;
        Ok(())
    }

    fn notify(&self, snapshot: &[GoalProjection]) {
        let presenters = self
            .presenters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for presenter in presenters {
            if let Err(err) = presenter.present(snapshot) {
                // Durable state already committed; tray divergence is only
                // reported, never rolled back.
                error!("event=tray_sync module=store status=error error={err}");
            }
        }
    }

    fn lock_goals(&self) -> MutexGuard<'_, Vec<Goal>> {
        self.goals.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn load_error(err: impl Into<StateError>) -> StoreError {
    StoreError::Load(err.into())
}
