//! Domain model for the weekly goal list.
//!
//! # Responsibility
//! - Define the canonical goal record shared by store, tray, and FFI layers.
//! - Keep creation defaults and input normalization in one place.
//!
//! # Invariants
//! - Every goal is identified by a stable `GoalId` that is never reused.
//! - Impediment notes are either meaningful text or absent, never an empty
//!   string.

pub mod goal;
