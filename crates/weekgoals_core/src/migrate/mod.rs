//! State schema migration registry and decoder.
//!
//! # Responsibility
//! - Decode raw state-file bytes into untyped goal records.
//! - Apply registered migrations in deterministic order.
//! - Decode migrated records into the typed model.
//!
//! # Invariants
//! - Migrations are pure record-to-record transforms; registry order never
//!   changes once released.
//! - Migrations operate on raw JSON maps, so unrecognized fields survive
//!   the post-migration rewrite.
//! - Every record that passes `decode_goals` has a well-formed priority.

use crate::model::goal::Goal;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Untyped goal record as stored on disk.
pub type RawRecord = Map<String, Value>;

pub type MigrateResult<T> = Result<T, MigrateError>;

/// Migration and decode failures.
#[derive(Debug)]
pub enum MigrateError {
    /// The state file is not the expected array-of-records shape.
    CorruptState(String),
}

impl Display for MigrateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CorruptState(message) => write!(f, "corrupt state file: {message}"),
        }
    }
}

impl Error for MigrateError {}

struct Migration {
    name: &'static str,
    apply: fn(&mut RawRecord) -> bool,
}

const MIGRATIONS: &[Migration] = &[Migration {
    name: "fill_default_priority",
    apply: fill_default_priority,
}];

/// Records created before the priority field existed default to `medium`.
fn fill_default_priority(record: &mut RawRecord) -> bool {
    match record.get("priority") {
        Some(Value::String(_)) => false,
        _ => {
            record.insert("priority".to_string(), Value::String("medium".to_string()));
            true
        }
    }
}

/// Parses state-file bytes into untyped records.
///
/// # Errors
/// - `CorruptState` when the bytes are not valid JSON, the top-level value
///   is not an array, or any element is not an object.
pub fn parse_records(bytes: &[u8]) -> MigrateResult<Vec<RawRecord>> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|err| MigrateError::CorruptState(format!("not valid JSON: {err}")))?;

    let Value::Array(entries) = value else {
        return Err(MigrateError::CorruptState(
            "top-level value is not an array".to_string(),
        ));
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            Value::Object(record) => Ok(record),
            other => Err(MigrateError::CorruptState(format!(
                "record at index {index} is not an object (found {})",
                value_kind(&other)
            ))),
        })
        .collect()
}

/// Applies all registered migrations to every record.
///
/// Returns `true` when any record was altered, signalling the caller to
/// rewrite the state file once.
pub fn run_migrations(records: &mut [RawRecord]) -> bool {
    let mut changed = false;
    for migration in MIGRATIONS {
        let mut applied = 0usize;
        for record in records.iter_mut() {
            if (migration.apply)(record) {
                applied += 1;
            }
        }
        if applied > 0 {
            log::info!(
                "event=state_migrate module=migrate status=ok migration={} records={applied}",
                migration.name
            );
            changed = true;
        }
    }
    changed
}

/// Decodes migrated records into the typed model.
///
/// Unknown extra fields are ignored here; they are preserved on disk by the
/// rewrite path, which serializes the raw records instead.
pub fn decode_goals(records: &[RawRecord]) -> MigrateResult<Vec<Goal>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            serde_json::from_value(Value::Object(record.clone())).map_err(|err| {
                MigrateError::CorruptState(format!("record at index {index} is malformed: {err}"))
            })
        })
        .collect()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_goals, parse_records, run_migrations, MigrateError};
    use crate::model::goal::Priority;
    use serde_json::json;

    fn records_from(value: serde_json::Value) -> Vec<super::RawRecord> {
        parse_records(value.to_string().as_bytes()).expect("fixture should parse")
    }

    #[test]
    fn parse_rejects_non_array_top_level() {
        let err = parse_records(b"{\"goals\": []}").expect_err("object top level must fail");
        assert!(matches!(err, MigrateError::CorruptState(_)));

        let err = parse_records(b"not json").expect_err("invalid JSON must fail");
        assert!(matches!(err, MigrateError::CorruptState(_)));
    }

    #[test]
    fn parse_rejects_non_object_records() {
        let err = parse_records(b"[1, 2]").expect_err("scalar records must fail");
        let MigrateError::CorruptState(message) = err;
        assert!(message.contains("index 0"));
    }

    #[test]
    fn missing_priority_is_filled_with_medium() {
        let mut records = records_from(json!([
            {
                "id": "7d1f2f6e-74a1-4adf-b0ff-25a72bd3d6ce",
                "title": "legacy goal",
                "completed": false,
                "createdAt": "2024-01-02T03:04:05.000Z"
            },
            {
                "id": "4b0f0a86-9a16-4b65-93b5-02efefcb5a4d",
                "title": "newer goal",
                "completed": true,
                "createdAt": "2024-02-02T03:04:05.000Z",
                "priority": "high"
            }
        ]));

        assert!(run_migrations(&mut records));
        assert_eq!(records[0]["priority"], "medium");
        assert_eq!(records[1]["priority"], "high");

        let goals = decode_goals(&records).expect("migrated records decode");
        assert_eq!(goals[0].priority, Priority::Medium);
        assert_eq!(goals[1].priority, Priority::High);
    }

    #[test]
    fn null_priority_is_treated_as_missing() {
        let mut records = records_from(json!([
            {
                "id": "7d1f2f6e-74a1-4adf-b0ff-25a72bd3d6ce",
                "title": "nulled",
                "completed": false,
                "createdAt": "2024-01-02T03:04:05.000Z",
                "priority": null
            }
        ]));

        assert!(run_migrations(&mut records));
        assert_eq!(records[0]["priority"], "medium");
    }

    #[test]
    fn fully_migrated_records_report_no_change() {
        let mut records = records_from(json!([
            {
                "id": "7d1f2f6e-74a1-4adf-b0ff-25a72bd3d6ce",
                "title": "current",
                "completed": false,
                "createdAt": "2024-01-02T03:04:05.000Z",
                "priority": "low"
            }
        ]));

        assert!(!run_migrations(&mut records));
    }

    #[test]
    fn migration_keeps_unrecognized_fields() {
        let mut records = records_from(json!([
            {
                "id": "7d1f2f6e-74a1-4adf-b0ff-25a72bd3d6ce",
                "title": "annotated",
                "completed": false,
                "createdAt": "2024-01-02T03:04:05.000Z",
                "color": "#ff0000"
            }
        ]));

        run_migrations(&mut records);
        assert_eq!(records[0]["color"], "#ff0000");

        let goals = decode_goals(&records).expect("extra fields are tolerated");
        assert_eq!(goals[0].title, "annotated");
    }

    #[test]
    fn decode_rejects_invalid_priority_label() {
        let records = records_from(json!([
            {
                "id": "7d1f2f6e-74a1-4adf-b0ff-25a72bd3d6ce",
                "title": "bad label",
                "completed": false,
                "createdAt": "2024-01-02T03:04:05.000Z",
                "priority": "urgent"
            }
        ]));

        let err = decode_goals(&records).expect_err("unknown label must fail decode");
        assert!(matches!(err, MigrateError::CorruptState(_)));
    }
}
