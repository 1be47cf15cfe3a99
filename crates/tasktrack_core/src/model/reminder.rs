//! Reminder domain model.
//!
//! A reminder asks to revisit a task later, e.g. to review something learned
//! a week after finishing it. At most one reminder exists per task.

use crate::model::task::TaskId;
use crate::model::time::Time;
use serde::{Deserialize, Serialize};

/// Stored identity of a reminder.
pub type ReminderId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub rowid: ReminderId,
    #[serde(rename = "taskId")]
    pub task_id: TaskId,
    #[serde(rename = "reminderTime")]
    pub reminder_time: Time,
    pub processed: bool,
    pub notes: String,
}

impl Reminder {
    /// Creates an unsaved, unprocessed reminder for `task_id`.
    pub fn new(task_id: TaskId, reminder_time: Time) -> Self {
        Self {
            rowid: 0,
            task_id,
            reminder_time,
            processed: false,
            notes: String::new(),
        }
    }
}
