//! UI-facing bridge crate for WeekGoals.
//!
//! All exported functions live in [`api`]; this crate keeps the view layer
//! decoupled from core internals.

pub mod api;
