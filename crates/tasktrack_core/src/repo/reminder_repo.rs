//! Reminder repository contract and SQLite implementation.
//!
//! # Invariants
//! - At most one reminder per task (`unique_reminder_task`); a second one is
//!   reported as `RepoError::AlreadyExists`.
//! - Adding a reminder for an unknown task is reported as `NotFound`.
//! - Deleting a task cascades to its reminder.

use crate::context::RequestContext;
use crate::db::{ConstraintKind, DbError, DbResult, FromRow, Handler, Row, Value};
use crate::model::reminder::{Reminder, ReminderId};
use crate::model::task::TaskId;
use crate::repo::{RepoError, RepoResult, REMINDER_ENTITY, TASK_ENTITY};
use std::sync::Arc;

const REMINDER_SELECT_SQL: &str = "SELECT
    rowid,
    taskId,
    reminderTime,
    processed,
    notes
FROM reminder";

/// Repository interface for reminder CRUD operations.
pub trait ReminderRepository: Send + Sync {
    /// Fails with `NotFound` when `task_id` has no reminder.
    fn get_for_task(&self, ctx: &RequestContext, task_id: TaskId) -> RepoResult<Reminder>;
    /// Persists a new reminder and returns its assigned id.
    fn add(&self, ctx: &RequestContext, reminder: &Reminder) -> RepoResult<ReminderId>;
    /// Fails with `NotFound` when `id` does not exist.
    fn delete(&self, ctx: &RequestContext, id: ReminderId) -> RepoResult<()>;
    /// Replaces the stored reminder identified by `reminder.rowid`.
    fn update(&self, ctx: &RequestContext, reminder: &Reminder) -> RepoResult<()>;
}

/// Reminder repository bound to a datastore handler.
pub struct SqliteReminderRepository {
    handler: Arc<dyn Handler>,
}

impl SqliteReminderRepository {
    pub fn new(handler: Arc<dyn Handler>) -> Self {
        Self { handler }
    }
}

impl ReminderRepository for SqliteReminderRepository {
    fn get_for_task(&self, _ctx: &RequestContext, task_id: TaskId) -> RepoResult<Reminder> {
        let row = self.handler.query_row(
            &format!("{REMINDER_SELECT_SQL} WHERE taskId = ?1 LIMIT 1;"),
            &[Value::from(task_id)],
        )?;
        match row {
            Some(row) => Ok(row.scan::<Reminder>()?),
            None => Err(RepoError::not_found(
                REMINDER_ENTITY,
                format!("task #{task_id}"),
            )),
        }
    }

    fn add(&self, _ctx: &RequestContext, reminder: &Reminder) -> RepoResult<ReminderId> {
        let outcome = self
            .handler
            .execute(
                "INSERT INTO reminder (
                    taskId,
                    reminderTime,
                    processed,
                    notes
                ) VALUES (?1, ?2, ?3, ?4);",
                &[
                    Value::from(reminder.task_id),
                    Value::from(reminder.reminder_time),
                    Value::from(reminder.processed),
                    Value::from(reminder.notes.as_str()),
                ],
            )
            .map_err(|err| constraint_error(err, reminder.task_id))?;
        Ok(outcome.last_insert_id())
    }

    fn delete(&self, _ctx: &RequestContext, id: ReminderId) -> RepoResult<()> {
        let outcome = self
            .handler
            .execute("DELETE FROM reminder WHERE rowid = ?1;", &[Value::from(id)])?;
        if outcome.rows_affected() == 0 {
            return Err(RepoError::not_found(REMINDER_ENTITY, format!("#{id}")));
        }
        Ok(())
    }

    fn update(&self, _ctx: &RequestContext, reminder: &Reminder) -> RepoResult<()> {
        let outcome = self
            .handler
            .execute(
                "UPDATE reminder
                 SET
                    taskId = ?1,
                    reminderTime = ?2,
                    processed = ?3,
                    notes = ?4
                 WHERE rowid = ?5;",
                &[
                    Value::from(reminder.task_id),
                    Value::from(reminder.reminder_time),
                    Value::from(reminder.processed),
                    Value::from(reminder.notes.as_str()),
                    Value::from(reminder.rowid),
                ],
            )
            .map_err(|err| constraint_error(err, reminder.task_id))?;
        if outcome.rows_affected() == 0 {
            return Err(RepoError::not_found(
                REMINDER_ENTITY,
                format!("#{}", reminder.rowid),
            ));
        }
        Ok(())
    }
}

impl FromRow for Reminder {
    fn from_row(row: &Row) -> DbResult<Self> {
        Ok(Self {
            rowid: row.get("rowid")?,
            task_id: row.get("taskId")?,
            reminder_time: row.get("reminderTime")?,
            processed: row.get("processed")?,
            notes: row.get("notes")?,
        })
    }
}

fn constraint_error(err: DbError, task_id: TaskId) -> RepoError {
    match err {
        DbError::Constraint {
            kind: ConstraintKind::Unique,
            ..
        } => RepoError::already_exists(REMINDER_ENTITY, format!("task #{task_id}")),
        DbError::Constraint {
            kind: ConstraintKind::ForeignKey,
            ..
        } => RepoError::not_found(TASK_ENTITY, format!("#{task_id}")),
        other => RepoError::Db(other),
    }
}
