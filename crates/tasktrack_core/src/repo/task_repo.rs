//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `task` table through the `Handler` contract.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Title uniqueness is enforced by the `unique_task_title` constraint and
//!   reported as `RepoError::AlreadyExists`.
//! - `update` replaces every mutable column of the row identified by `rowid`;
//!   `created` is never rewritten.
//! - Row extraction failures are returned, never panicked.

use crate::context::RequestContext;
use crate::db::{ConstraintKind, DbError, DbResult, FromRow, Handler, Row, Value};
use crate::model::task::{Task, TaskId};
use crate::repo::{RepoError, RepoResult, TASK_ENTITY};
use log::{debug, warn};
use std::sync::Arc;

const TASK_SELECT_SQL: &str = "SELECT
    rowid,
    title,
    description,
    dueDate,
    status,
    priority,
    effort,
    created
FROM task";

/// Repository interface for task CRUD operations.
///
/// Implementations must be interchangeable without any change visible to
/// the service layer.
pub trait TaskRepository: Send + Sync {
    /// Fails with `NotFound` when no task has `title`.
    fn get_by_title(&self, ctx: &RequestContext, title: &str) -> RepoResult<Task>;
    /// Returns every task ordered by id; empty when the store is empty.
    fn get_all(&self, ctx: &RequestContext) -> RepoResult<Vec<Task>>;
    /// Persists a new task and returns its assigned id.
    ///
    /// `task.rowid` is ignored. Fails with `AlreadyExists` on a duplicate title.
    fn add(&self, ctx: &RequestContext, task: &Task) -> RepoResult<TaskId>;
    /// Fails with `NotFound` when `id` does not exist.
    fn delete(&self, ctx: &RequestContext, id: TaskId) -> RepoResult<()>;
    /// Fails with `NotFound` when no task has `title`.
    fn delete_by_title(&self, ctx: &RequestContext, title: &str) -> RepoResult<()>;
    /// Replaces the stored task identified by `task.rowid`.
    fn update(&self, ctx: &RequestContext, task: &Task) -> RepoResult<()>;
}

/// Task repository bound to a datastore handler.
pub struct SqliteTaskRepository {
    handler: Arc<dyn Handler>,
}

impl SqliteTaskRepository {
    pub fn new(handler: Arc<dyn Handler>) -> Self {
        Self { handler }
    }
}

impl TaskRepository for SqliteTaskRepository {
    fn get_by_title(&self, ctx: &RequestContext, title: &str) -> RepoResult<Task> {
        let row = self.handler.query_row(
            &format!("{TASK_SELECT_SQL} WHERE title = ?1;"),
            &[Value::from(title)],
        )?;
        match row {
            Some(row) => Ok(row.scan::<Task>()?),
            None => {
                debug!(
                    "event=task_lookup module=repo status=miss request_id={}",
                    ctx.request_id()
                );
                Err(RepoError::not_found(TASK_ENTITY, title))
            }
        }
    }

    fn get_all(&self, _ctx: &RequestContext) -> RepoResult<Vec<Task>> {
        let rows = self
            .handler
            .query(&format!("{TASK_SELECT_SQL} ORDER BY rowid ASC;"), &[])?;
        let tasks = rows
            .map(|row| row.scan::<Task>())
            .collect::<DbResult<Vec<_>>>()?;
        Ok(tasks)
    }

    fn add(&self, ctx: &RequestContext, task: &Task) -> RepoResult<TaskId> {
        let outcome = self
            .handler
            .execute(
                "INSERT INTO task (
                    title,
                    description,
                    dueDate,
                    status,
                    priority,
                    effort,
                    created
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
                &[
                    Value::from(task.title.as_str()),
                    Value::from(task.description.as_str()),
                    Value::from(task.due_date),
                    Value::from(task.status),
                    Value::from(task.priority),
                    Value::from(task.effort),
                    Value::from(task.created),
                ],
            )
            .map_err(|err| duplicate_title(err, &task.title))?;

        debug!(
            "event=task_insert module=repo status=ok request_id={} task_id={}",
            ctx.request_id(),
            outcome.last_insert_id()
        );
        Ok(outcome.last_insert_id())
    }

    fn delete(&self, _ctx: &RequestContext, id: TaskId) -> RepoResult<()> {
        let outcome = self
            .handler
            .execute("DELETE FROM task WHERE rowid = ?1;", &[Value::from(id)])?;
        if outcome.rows_affected() == 0 {
            return Err(RepoError::not_found(TASK_ENTITY, format!("#{id}")));
        }
        Ok(())
    }

    fn delete_by_title(&self, _ctx: &RequestContext, title: &str) -> RepoResult<()> {
        let outcome = self
            .handler
            .execute("DELETE FROM task WHERE title = ?1;", &[Value::from(title)])?;
        if outcome.rows_affected() == 0 {
            return Err(RepoError::not_found(TASK_ENTITY, title));
        }
        Ok(())
    }

    fn update(&self, _ctx: &RequestContext, task: &Task) -> RepoResult<()> {
        let outcome = self
            .handler
            .execute(
                "UPDATE task
                 SET
                    title = ?1,
                    description = ?2,
                    dueDate = ?3,
                    status = ?4,
                    priority = ?5,
                    effort = ?6
                 WHERE rowid = ?7;",
                &[
                    Value::from(task.title.as_str()),
                    Value::from(task.description.as_str()),
                    Value::from(task.due_date),
                    Value::from(task.status),
                    Value::from(task.priority),
                    Value::from(task.effort),
                    Value::from(task.rowid),
                ],
            )
            .map_err(|err| duplicate_title(err, &task.title))?;

        if outcome.rows_affected() == 0 {
            return Err(RepoError::not_found(
                TASK_ENTITY,
                format!("#{}", task.rowid),
            ));
        }
        Ok(())
    }
}

impl FromRow for Task {
    fn from_row(row: &Row) -> DbResult<Self> {
        Ok(Self {
            rowid: row.get("rowid")?,
            title: row.get("title")?,
            description: row.get("description")?,
            due_date: row.get("dueDate")?,
            status: row.get("status")?,
            priority: row.get("priority")?,
            effort: row.get("effort")?,
            created: row.get("created")?,
        })
    }
}

fn duplicate_title(err: DbError, title: &str) -> RepoError {
    match err {
        DbError::Constraint {
            kind: ConstraintKind::Unique,
            ..
        } => {
            warn!("event=task_write module=repo status=error error_code=duplicate_title");
            RepoError::already_exists(TASK_ENTITY, title)
        }
        other => RepoError::Db(other),
    }
}
