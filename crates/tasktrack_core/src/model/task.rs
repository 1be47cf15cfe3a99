//! Task domain model.
//!
//! # Responsibility
//! - Define the Task aggregate root and its closed value types.
//! - Provide parse/format helpers for `Status` and `Priority`.
//!
//! # Invariants
//! - `rowid` is assigned by the repository at creation and never reused.
//! - `created` is set once at creation and never changed by updates.
//! - Title uniqueness is a repository concern, not checked here.

use crate::model::time::{Duration, Time};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Stored identity of a task.
pub type TaskId = i64;

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 30;
/// Maximum description length in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 600;
/// Effort assigned when a create request leaves it blank.
pub const DEFAULT_EFFORT: Duration = Duration::from_hours(24);

/// Task progress state. No transition graph is enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Pending,
    #[serde(rename = "In-Progress")]
    InProgress,
    Done,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Pending, Status::InProgress, Status::Done];

    /// Stable string used on the wire and in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In-Progress",
            Self::Done => "Done",
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| StatusParseError(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusParseError(pub String);

impl Display for StatusParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid status `{}`: only Pending, In-Progress and Done are valid",
            self.0
        )
    }
}

impl Error for StatusParseError {}

/// Task urgency from 1 (lowest) to 5 (highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, PriorityError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(PriorityError(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Priority {
    type Error = PriorityError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Priority> for u8 {
    fn from(value: Priority) -> Self {
        value.0
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityError(pub u8);

impl Display for PriorityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "priority {} is out of range: priority ranges from {} (least) to {} (most)",
            self.0,
            Priority::MIN,
            Priority::MAX
        )
    }
}

impl Error for PriorityError {}

/// Task aggregate root as stored and returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub rowid: TaskId,
    pub title: String,
    pub description: String,
    #[serde(rename = "dueDate")]
    pub due_date: Time,
    pub status: Status,
    pub priority: Priority,
    pub effort: Duration,
    pub created: Time,
}

impl Task {
    /// Creates an unsaved task in `Pending` state with `created` set to `created`.
    ///
    /// `rowid` stays 0 until the repository assigns one.
    pub fn new(
        title: impl Into<String>,
        due_date: Time,
        priority: Priority,
        created: Time,
    ) -> Self {
        Self {
            rowid: 0,
            title: title.into(),
            description: String::new(),
            due_date,
            status: Status::Pending,
            priority,
            effort: DEFAULT_EFFORT,
            created,
        }
    }
}

impl Display for Task {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Task{{rowid:{}, title:\"{}\", dueDate:\"{}\", status:{}}}",
            self.rowid, self.title, self.due_date, self.status
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Priority, PriorityError, Status, StatusParseError};

    #[test]
    fn status_parses_only_closed_set() {
        assert_eq!("In-Progress".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!(
            "in-progress".parse::<Status>().unwrap_err(),
            StatusParseError("in-progress".to_string())
        );
    }

    #[test]
    fn priority_rejects_out_of_range() {
        assert_eq!(Priority::new(0).unwrap_err(), PriorityError(0));
        assert_eq!(Priority::new(6).unwrap_err(), PriorityError(6));
        assert_eq!(Priority::new(5).unwrap().value(), 5);
    }
}
