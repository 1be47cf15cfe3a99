//! Scriptable repository doubles for service-level tests.
//!
//! Each method's return value comes from a closure installed with the
//! matching `on_*` setter; unset methods fall back to a neutral default
//! (empty list, id 0, `Ok(())`, or `NotFound` for lookups). Every call is
//! recorded so tests can assert which repository operations ran.

use crate::context::RequestContext;
use crate::model::reminder::{Reminder, ReminderId};
use crate::model::task::{Task, TaskId};
use crate::repo::reminder_repo::ReminderRepository;
use crate::repo::task_repo::TaskRepository;
use crate::repo::{RepoError, RepoResult, REMINDER_ENTITY, TASK_ENTITY};
use std::sync::{Mutex, PoisonError};

type Reply<A, T> = Box<dyn Fn(A) -> RepoResult<T> + Send + Sync>;
type StrReply<T> = Box<dyn Fn(&str) -> RepoResult<T> + Send + Sync>;

/// One recorded call against a mock task repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskCall {
    GetByTitle(String),
    GetAll,
    Add(Task),
    Delete(TaskId),
    DeleteByTitle(String),
    Update(Task),
}

/// Task repository whose answers are supplied by the test.
#[derive(Default)]
pub struct MockTaskRepository {
    get_by_title: Option<StrReply<Task>>,
    get_all: Option<Reply<(), Vec<Task>>>,
    add: Option<Reply<Task, TaskId>>,
    delete: Option<Reply<TaskId, ()>>,
    delete_by_title: Option<StrReply<()>>,
    update: Option<Reply<Task, ()>>,
    calls: Mutex<Vec<TaskCall>>,
}

impl MockTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers every `get_by_title` with `reply(title)`.
    pub fn on_get_by_title(
        mut self,
        reply: impl Fn(&str) -> RepoResult<Task> + Send + Sync + 'static,
    ) -> Self {
        self.get_by_title = Some(Box::new(reply));
        self
    }

    pub fn on_get_all(
        mut self,
        reply: impl Fn() -> RepoResult<Vec<Task>> + Send + Sync + 'static,
    ) -> Self {
        self.get_all = Some(Box::new(move |()| reply()));
        self
    }

    pub fn on_add(
        mut self,
        reply: impl Fn(Task) -> RepoResult<TaskId> + Send + Sync + 'static,
    ) -> Self {
        self.add = Some(Box::new(reply));
        self
    }

    pub fn on_delete(
        mut self,
        reply: impl Fn(TaskId) -> RepoResult<()> + Send + Sync + 'static,
    ) -> Self {
        self.delete = Some(Box::new(reply));
        self
    }

    pub fn on_delete_by_title(
        mut self,
        reply: impl Fn(&str) -> RepoResult<()> + Send + Sync + 'static,
    ) -> Self {
        self.delete_by_title = Some(Box::new(reply));
        self
    }

    pub fn on_update(
        mut self,
        reply: impl Fn(Task) -> RepoResult<()> + Send + Sync + 'static,
    ) -> Self {
        self.update = Some(Box::new(reply));
        self
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<TaskCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: TaskCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl TaskRepository for MockTaskRepository {
    fn get_by_title(&self, _ctx: &RequestContext, title: &str) -> RepoResult<Task> {
        self.record(TaskCall::GetByTitle(title.to_string()));
        match &self.get_by_title {
            Some(reply) => reply(title),
            None => Err(RepoError::not_found(TASK_ENTITY, title)),
        }
    }

    fn get_all(&self, _ctx: &RequestContext) -> RepoResult<Vec<Task>> {
        self.record(TaskCall::GetAll);
        match &self.get_all {
            Some(reply) => reply(()),
            None => Ok(Vec::new()),
        }
    }

    fn add(&self, _ctx: &RequestContext, task: &Task) -> RepoResult<TaskId> {
        self.record(TaskCall::Add(task.clone()));
        match &self.add {
            Some(reply) => reply(task.clone()),
            None => Ok(0),
        }
    }

    fn delete(&self, _ctx: &RequestContext, id: TaskId) -> RepoResult<()> {
        self.record(TaskCall::Delete(id));
        match &self.delete {
            Some(reply) => reply(id),
            None => Ok(()),
        }
    }

    fn delete_by_title(&self, _ctx: &RequestContext, title: &str) -> RepoResult<()> {
        self.record(TaskCall::DeleteByTitle(title.to_string()));
        match &self.delete_by_title {
            Some(reply) => reply(title),
            None => Ok(()),
        }
    }

    fn update(&self, _ctx: &RequestContext, task: &Task) -> RepoResult<()> {
        self.record(TaskCall::Update(task.clone()));
        match &self.update {
            Some(reply) => reply(task.clone()),
            None => Ok(()),
        }
    }
}

/// One recorded call against a mock reminder repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderCall {
    GetForTask(TaskId),
    Add(Reminder),
    Delete(ReminderId),
    Update(Reminder),
}

/// Reminder repository whose answers are supplied by the test.
#[derive(Default)]
pub struct MockReminderRepository {
    get_for_task: Option<Reply<TaskId, Reminder>>,
    add: Option<Reply<Reminder, ReminderId>>,
    delete: Option<Reply<ReminderId, ()>>,
    update: Option<Reply<Reminder, ()>>,
    calls: Mutex<Vec<ReminderCall>>,
}

impl MockReminderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_get_for_task(
        mut self,
        reply: impl Fn(TaskId) -> RepoResult<Reminder> + Send + Sync + 'static,
    ) -> Self {
        self.get_for_task = Some(Box::new(reply));
        self
    }

    pub fn on_add(
        mut self,
        reply: impl Fn(Reminder) -> RepoResult<ReminderId> + Send + Sync + 'static,
    ) -> Self {
        self.add = Some(Box::new(reply));
        self
    }

    pub fn on_delete(
        mut self,
        reply: impl Fn(ReminderId) -> RepoResult<()> + Send + Sync + 'static,
    ) -> Self {
        self.delete = Some(Box::new(reply));
        self
    }

    pub fn on_update(
        mut self,
        reply: impl Fn(Reminder) -> RepoResult<()> + Send + Sync + 'static,
    ) -> Self {
        self.update = Some(Box::new(reply));
        self
    }

    pub fn calls(&self) -> Vec<ReminderCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: ReminderCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl ReminderRepository for MockReminderRepository {
    fn get_for_task(&self, _ctx: &RequestContext, task_id: TaskId) -> RepoResult<Reminder> {
        self.record(ReminderCall::GetForTask(task_id));
        match &self.get_for_task {
            Some(reply) => reply(task_id),
            None => Err(RepoError::not_found(
                REMINDER_ENTITY,
                format!("task #{task_id}"),
            )),
        }
    }

    fn add(&self, _ctx: &RequestContext, reminder: &Reminder) -> RepoResult<ReminderId> {
        self.record(ReminderCall::Add(reminder.clone()));
        match &self.add {
            Some(reply) => reply(reminder.clone()),
            None => Ok(0),
        }
    }

    fn delete(&self, _ctx: &RequestContext, id: ReminderId) -> RepoResult<()> {
        self.record(ReminderCall::Delete(id));
        match &self.delete {
            Some(reply) => reply(id),
            None => Ok(()),
        }
    }

    fn update(&self, _ctx: &RequestContext, reminder: &Reminder) -> RepoResult<()> {
        self.record(ReminderCall::Update(reminder.clone()));
        match &self.update {
            Some(reply) => reply(reminder.clone()),
            None => Ok(()),
        }
    }
}
