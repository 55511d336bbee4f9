//! FFI use-case API for the goal-tracker UI.
//!
//! # Responsibility
//! - Expose the goal store's public contract to the view layer via FRB.
//! - Keep error semantics simple: response envelopes, never exceptions.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - One process-global store owns the authoritative goal list; view and
//!   tray surfaces both go through it.

use std::path::PathBuf;
use std::sync::OnceLock;

use weekgoals_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Goal, GoalId, GoalStore, JsonStateFile, Priority,
};

const STATE_FILE_FALLBACK_NAME: &str = "weekgoals_goals.json";
static STORE: OnceLock<GoalStore<JsonStateFile>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Idempotent for the same `level + log_dir`; reconfiguration attempts
///   return an error message.
/// - Never panics; returns empty string on success and error message on
///   failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One goal as rendered by the view layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalView {
    /// Stable goal ID in string form.
    pub id: String,
    /// Display text.
    pub title: String,
    /// Completion flag.
    pub completed: bool,
    /// Optional blocker note; absent means "no blocker".
    pub impediments: Option<String>,
    /// Priority label (`low|medium|high`).
    pub priority: String,
}

/// Goal list envelope for the main view and tray rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalListResponse {
    /// Goals in insertion order.
    pub items: Vec<GoalView>,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Generic action response envelope for store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Optional affected goal ID.
    pub goal_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl GoalActionResponse {
    fn success(message: impl Into<String>, goal_id: Option<String>) -> Self {
        Self {
            ok: true,
            goal_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            goal_id: None,
            message: message.into(),
        }
    }
}

/// Loads persisted goals into the process-global store.
///
/// # FFI contract
/// - Sync call, file-backed execution; creates an empty state file on
///   first run and migrates legacy records.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn load_goals() -> GoalActionResponse {
    match store().load() {
        Ok(()) => GoalActionResponse::success("Goals loaded.", None),
        Err(err) => GoalActionResponse::failure(format!("load_goals failed: {err}")),
    }
}

/// Returns the committed goal list.
///
/// # FFI contract
/// - Sync call, in-memory snapshot; call `load_goals` first on startup.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn list_goals() -> GoalListResponse {
    let items = store()
        .goals()
        .iter()
        .map(to_goal_view)
        .collect::<Vec<_>>();
    let message = if items.is_empty() {
        "No goals yet.".to_string()
    } else {
        format!("{} goal(s).", items.len())
    };
    GoalListResponse { items, message }
}

/// Adds a new goal with an optional priority label (defaults to `medium`).
///
/// # FFI contract
/// - Sync call, file-backed execution.
/// - Never panics.
/// - Returns the created goal ID on success.
#[flutter_rust_bridge::frb(sync)]
pub fn add_goal(title: String, priority: Option<String>) -> GoalActionResponse {
    let priority = match parse_priority_label(priority.as_deref()) {
        Ok(priority) => priority,
        Err(message) => return GoalActionResponse::failure(message),
    };

    match store().add(title.trim(), priority) {
        Ok(id) => GoalActionResponse::success("Goal added.", Some(id.to_string())),
        Err(err) => GoalActionResponse::failure(format!("add_goal failed: {err}")),
    }
}

/// Flips completion on a goal.
///
/// # FFI contract
/// - Sync call, file-backed execution; unknown ids are a successful no-op.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn toggle_goal(id: String) -> GoalActionResponse {
    with_goal_id(&id, "toggle_goal", |goal_id| store().toggle(goal_id))
}

/// Removes a goal.
///
/// # FFI contract
/// - Sync call, file-backed execution; unknown ids are a successful no-op.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn remove_goal(id: String) -> GoalActionResponse {
    with_goal_id(&id, "remove_goal", |goal_id| store().remove(goal_id))
}

/// Empties the whole goal list.
///
/// # FFI contract
/// - Sync call, file-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn clear_goals() -> GoalActionResponse {
    match store().clear() {
        Ok(()) => GoalActionResponse::success("Goals cleared.", None),
        Err(err) => GoalActionResponse::failure(format!("clear_goals failed: {err}")),
    }
}

/// Sets or clears the impediment note on a goal.
///
/// Passing `None` or empty text clears the note.
///
/// # FFI contract
/// - Sync call, file-backed execution; unknown ids are a successful no-op.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn set_impediment(id: String, note: Option<String>) -> GoalActionResponse {
    with_goal_id(&id, "set_impediment", |goal_id| {
        store().set_impediment(goal_id, note.as_deref())
    })
}

/// Replaces the priority level on a goal.
///
/// # FFI contract
/// - Sync call, file-backed execution; unknown ids are a successful no-op.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn set_priority(id: String, priority: String) -> GoalActionResponse {
    let priority = match parse_priority_label(Some(priority.as_str())) {
        Ok(priority) => priority,
        Err(message) => return GoalActionResponse::failure(message),
    };
    with_goal_id(&id, "set_priority", |goal_id| {
        store().set_priority(goal_id, priority)
    })
}

fn store() -> &'static GoalStore<JsonStateFile> {
    STORE.get_or_init(|| GoalStore::new(JsonStateFile::new(resolve_state_path())))
}

fn resolve_state_path() -> PathBuf {
    if let Ok(raw) = std::env::var("WEEKGOALS_STATE_PATH") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    weekgoals_core::resolve_state_path()
        .unwrap_or_else(|_| std::env::temp_dir().join(STATE_FILE_FALLBACK_NAME))
}

fn with_goal_id(
    id: &str,
    op: &str,
    apply: impl FnOnce(GoalId) -> weekgoals_core::StoreResult<()>,
) -> GoalActionResponse {
    let goal_id = match id.trim().parse::<GoalId>() {
        Ok(goal_id) => goal_id,
        Err(_) => return GoalActionResponse::failure(format!("{op} failed: invalid goal id `{id}`")),
    };
    match apply(goal_id) {
        Ok(()) => GoalActionResponse::success("Done.", Some(goal_id.to_string())),
        Err(err) => GoalActionResponse::failure(format!("{op} failed: {err}")),
    }
}

fn parse_priority_label(label: Option<&str>) -> Result<Priority, String> {
    match label {
        None => Ok(Priority::Medium),
        Some(raw) => {
            let normalized = raw.trim().to_ascii_lowercase();
            if normalized.is_empty() {
                return Ok(Priority::Medium);
            }
            Priority::parse(&normalized)
                .ok_or_else(|| format!("invalid priority `{raw}`; expected low|medium|high"))
        }
    }
}

fn to_goal_view(goal: &Goal) -> GoalView {
    GoalView {
        id: goal.id.to_string(),
        title: goal.title.clone(),
        completed: goal.completed,
        impediments: goal.impediments.clone(),
        priority: goal.priority.as_str().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        add_goal, core_version, init_logging, list_goals, ping, remove_goal, set_impediment,
        set_priority, toggle_goal,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    fn use_test_state_path() {
        let path = std::env::temp_dir().join(format!(
            "weekgoals-ffi-state-{}.json",
            std::process::id()
        ));
        std::env::set_var("WEEKGOALS_STATE_PATH", &path);
    }

    fn unique_title(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }

    fn view_by_id(id: &str) -> Option<super::GoalView> {
        list_goals().items.into_iter().find(|item| item.id == id)
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn add_goal_defaults_priority_and_lists_the_goal() {
        use_test_state_path();
        let title = unique_title("ffi-add");

        let created = add_goal(title.clone(), None);
        assert!(created.ok, "{}", created.message);
        let id = created.goal_id.expect("created goal returns an id");

        let view = view_by_id(&id).expect("created goal is listed");
        assert_eq!(view.title, title);
        assert_eq!(view.priority, "medium");
        assert!(!view.completed);
        assert!(view.impediments.is_none());
    }

    #[test]
    fn add_goal_rejects_invalid_priority_label() {
        use_test_state_path();
        let response = add_goal(unique_title("ffi-bad-priority"), Some("urgent".to_string()));
        assert!(!response.ok);
        assert!(response.message.contains("invalid priority"));
    }

    #[test]
    fn add_goal_rejects_blank_title() {
        use_test_state_path();
        let response = add_goal("   ".to_string(), None);
        assert!(!response.ok);
        assert!(response.message.contains("title"));
    }

    #[test]
    fn toggle_goal_flips_completion() {
        use_test_state_path();
        let created = add_goal(unique_title("ffi-toggle"), Some("high".to_string()));
        assert!(created.ok, "{}", created.message);
        let id = created.goal_id.expect("created goal returns an id");

        let toggled = toggle_goal(id.clone());
        assert!(toggled.ok, "{}", toggled.message);
        assert!(view_by_id(&id).expect("goal is listed").completed);
    }

    #[test]
    fn toggle_goal_rejects_malformed_id() {
        use_test_state_path();
        let response = toggle_goal("not-a-uuid".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("invalid goal id"));
    }

    #[test]
    fn set_impediment_round_trips_and_empty_text_clears() {
        use_test_state_path();
        let created = add_goal(unique_title("ffi-impediment"), None);
        assert!(created.ok, "{}", created.message);
        let id = created.goal_id.expect("created goal returns an id");

        let set = set_impediment(id.clone(), Some("waiting on design".to_string()));
        assert!(set.ok, "{}", set.message);
        assert_eq!(
            view_by_id(&id).expect("goal is listed").impediments.as_deref(),
            Some("waiting on design")
        );

        let cleared = set_impediment(id.clone(), Some(String::new()));
        assert!(cleared.ok, "{}", cleared.message);
        assert!(view_by_id(&id).expect("goal is listed").impediments.is_none());
    }

    #[test]
    fn set_priority_updates_the_label() {
        use_test_state_path();
        let created = add_goal(unique_title("ffi-priority"), None);
        assert!(created.ok, "{}", created.message);
        let id = created.goal_id.expect("created goal returns an id");

        let updated = set_priority(id.clone(), "low".to_string());
        assert!(updated.ok, "{}", updated.message);
        assert_eq!(view_by_id(&id).expect("goal is listed").priority, "low");
    }

    #[test]
    fn remove_goal_drops_it_from_the_list() {
        use_test_state_path();
        let created = add_goal(unique_title("ffi-remove"), None);
        assert!(created.ok, "{}", created.message);
        let id = created.goal_id.expect("created goal returns an id");

        let removed = remove_goal(id.clone());
        assert!(removed.ok, "{}", removed.message);
        assert!(view_by_id(&id).is_none());

        let again = remove_goal(id);
        assert!(again.ok, "removing an absent goal stays a no-op");
    }
}
