//! Task-tracking domain model.
//!
//! # Responsibility
//! - Define passive value types for tasks, reminders and their fields.
//! - Own canonical textual forms for timestamps and durations.
//!
//! # Invariants
//! - Domain types carry formatting/validation helpers only, no persistence.
//! - Every task is identified by a repository-assigned `TaskId`.

pub mod reminder;
pub mod task;
pub mod time;
