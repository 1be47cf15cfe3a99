//! Map-backed repositories for development and tests.
//!
//! # Invariants
//! - Ids are assigned from a counter starting at 0 and never reused.
//! - Title (task) and task id (reminder) uniqueness mirror the SQLite
//!   constraints, so callers observe the same errors.
//! - The in-memory reminder store does not check that the task exists.

use crate::context::RequestContext;
use crate::model::reminder::{Reminder, ReminderId};
use crate::model::task::{Task, TaskId};
use crate::repo::reminder_repo::ReminderRepository;
use crate::repo::task_repo::TaskRepository;
use crate::repo::{RepoError, RepoResult, REMINDER_ENTITY, TASK_ENTITY};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct TaskTable {
    by_id: BTreeMap<TaskId, Task>,
    id_by_title: HashMap<String, TaskId>,
    next_id: TaskId,
}

impl TaskTable {
    fn remove(&mut self, id: TaskId) -> Option<Task> {
        let task = self.by_id.remove(&id)?;
        self.id_by_title.remove(&task.title);
        Some(task)
    }
}

/// In-memory task repository.
#[derive(Debug, Default)]
pub struct InMemoryTaskRepository {
    table: Mutex<TaskTable>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.table().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn table(&self) -> MutexGuard<'_, TaskTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TaskRepository for InMemoryTaskRepository {
    fn get_by_title(&self, _ctx: &RequestContext, title: &str) -> RepoResult<Task> {
        let table = self.table();
        table
            .id_by_title
            .get(title)
            .and_then(|id| table.by_id.get(id))
            .cloned()
            .ok_or_else(|| RepoError::not_found(TASK_ENTITY, title))
    }

    fn get_all(&self, _ctx: &RequestContext) -> RepoResult<Vec<Task>> {
        Ok(self.table().by_id.values().cloned().collect())
    }

    fn add(&self, _ctx: &RequestContext, task: &Task) -> RepoResult<TaskId> {
        let mut table = self.table();
        if table.id_by_title.contains_key(&task.title) {
            return Err(RepoError::already_exists(TASK_ENTITY, &task.title));
        }

        let id = table.next_id;
        table.next_id += 1;
        let mut stored = task.clone();
        stored.rowid = id;
        table.id_by_title.insert(stored.title.clone(), id);
        table.by_id.insert(id, stored);
        Ok(id)
    }

    fn delete(&self, _ctx: &RequestContext, id: TaskId) -> RepoResult<()> {
        self.table()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RepoError::not_found(TASK_ENTITY, format!("#{id}")))
    }

    fn delete_by_title(&self, _ctx: &RequestContext, title: &str) -> RepoResult<()> {
        let mut table = self.table();
        let id = table
            .id_by_title
            .get(title)
            .copied()
            .ok_or_else(|| RepoError::not_found(TASK_ENTITY, title))?;
        table.remove(id);
        Ok(())
    }

    fn update(&self, _ctx: &RequestContext, task: &Task) -> RepoResult<()> {
        let mut table = self.table();
        let previous_title = match table.by_id.get(&task.rowid) {
            Some(existing) => existing.title.clone(),
            None => {
                return Err(RepoError::not_found(
                    TASK_ENTITY,
                    format!("#{}", task.rowid),
                ))
            }
        };

        if previous_title != task.title {
            if table.id_by_title.contains_key(&task.title) {
                return Err(RepoError::already_exists(TASK_ENTITY, &task.title));
            }
            table.id_by_title.remove(&previous_title);
            table.id_by_title.insert(task.title.clone(), task.rowid);
        }

        // `created` is immutable once stored.
        let created = table.by_id.get(&task.rowid).map(|existing| existing.created);
        let mut stored = task.clone();
        if let Some(created) = created {
            stored.created = created;
        }
        table.by_id.insert(task.rowid, stored);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct ReminderTable {
    by_id: BTreeMap<ReminderId, Reminder>,
    id_by_task: HashMap<TaskId, ReminderId>,
    next_id: ReminderId,
}

/// In-memory reminder repository.
#[derive(Debug, Default)]
pub struct InMemoryReminderRepository {
    table: Mutex<ReminderTable>,
}

impl InMemoryReminderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, ReminderTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ReminderRepository for InMemoryReminderRepository {
    fn get_for_task(&self, _ctx: &RequestContext, task_id: TaskId) -> RepoResult<Reminder> {
        let table = self.table();
        table
            .id_by_task
            .get(&task_id)
            .and_then(|id| table.by_id.get(id))
            .cloned()
            .ok_or_else(|| RepoError::not_found(REMINDER_ENTITY, format!("task #{task_id}")))
    }

    fn add(&self, _ctx: &RequestContext, reminder: &Reminder) -> RepoResult<ReminderId> {
        let mut table = self.table();
        if table.id_by_task.contains_key(&reminder.task_id) {
            return Err(RepoError::already_exists(
                REMINDER_ENTITY,
                format!("task #{}", reminder.task_id),
            ));
        }

        let id = table.next_id;
        table.next_id += 1;
        let mut stored = reminder.clone();
        stored.rowid = id;
        table.id_by_task.insert(stored.task_id, id);
        table.by_id.insert(id, stored);
        Ok(id)
    }

    fn delete(&self, _ctx: &RequestContext, id: ReminderId) -> RepoResult<()> {
        let mut table = self.table();
        let reminder = table
            .by_id
            .remove(&id)
            .ok_or_else(|| RepoError::not_found(REMINDER_ENTITY, format!("#{id}")))?;
        table.id_by_task.remove(&reminder.task_id);
        Ok(())
    }

    fn update(&self, _ctx: &RequestContext, reminder: &Reminder) -> RepoResult<()> {
        let mut table = self.table();
        let previous_task = match table.by_id.get(&reminder.rowid) {
            Some(existing) => existing.task_id,
            None => {
                return Err(RepoError::not_found(
                    REMINDER_ENTITY,
                    format!("#{}", reminder.rowid),
                ))
            }
        };

        if previous_task != reminder.task_id {
            if table.id_by_task.contains_key(&reminder.task_id) {
                return Err(RepoError::already_exists(
                    REMINDER_ENTITY,
                    format!("task #{}", reminder.task_id),
                ));
            }
            table.id_by_task.remove(&previous_task);
            table.id_by_task.insert(reminder.task_id, reminder.rowid);
        }

        table.by_id.insert(reminder.rowid, reminder.clone());
        Ok(())
    }
}
