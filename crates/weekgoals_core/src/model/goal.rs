//! Goal domain model.
//!
//! # Responsibility
//! - Define the canonical goal record persisted to the state file.
//! - Provide creation defaults and in-place mutation helpers.
//!
//! # Invariants
//! - `id` is stable and never reused for another goal.
//! - `title` is non-empty after trimming and immutable after creation.
//! - `impediments` is `None` or non-empty text; empty input is normalized
//!   to `None` before it reaches the record.
//! - `created_at` is an RFC 3339 timestamp with millisecond precision.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a goal.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type GoalId = Uuid;

/// User-assignable priority level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl Priority {
    /// Stable lowercase label used by the persisted format and FFI surface.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parses a lowercase priority label.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failures for goal construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalValidationError {
    EmptyTitle,
}

impl Display for GoalValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "goal title must not be empty"),
        }
    }
}

impl Error for GoalValidationError {}

/// One trackable weekly goal.
///
/// The serialized shape matches the state file schema: `createdAt` keeps its
/// external camelCase name, `impediments` is omitted entirely when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    /// Stable goal ID, generated at creation.
    pub id: GoalId,
    /// Display text, immutable after creation (there is no rename).
    pub title: String,
    /// Completion flag, flipped by the toggle operation.
    pub completed: bool,
    /// RFC 3339 creation timestamp.
    #[serde(rename = "createdAt")]
    pub created_at: String,
    /// Optional free-text blocker note; `None` means "no blocker".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impediments: Option<String>,
    /// Priority level; legacy records gain `medium` via migration.
    pub priority: Priority,
}

impl Goal {
    /// Creates a new goal with a generated stable ID and a now-timestamp.
    ///
    /// # Invariants
    /// - `completed` starts as `false`.
    /// - `impediments` starts as `None`.
    pub fn new(title: impl Into<String>, priority: Priority) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            completed: false,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            impediments: None,
            priority,
        }
    }

    /// Validates record-level invariants.
    ///
    /// # Errors
    /// - `EmptyTitle` when the title is empty or whitespace-only.
    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.title.trim().is_empty() {
            return Err(GoalValidationError::EmptyTitle);
        }
        Ok(())
    }

    /// Flips the completion flag.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }

    /// Sets or clears the impediment note.
    ///
    /// Empty and whitespace-only input clears the note, so an empty string
    /// is never persisted.
    pub fn set_impediment(&mut self, note: Option<&str>) {
        self.impediments = normalize_impediment(note);
    }

    /// Replaces the priority level.
    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }
}

/// Normalizes impediment input: trims, maps empty text to `None`.
pub fn normalize_impediment(note: Option<&str>) -> Option<String> {
    let trimmed = note?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
