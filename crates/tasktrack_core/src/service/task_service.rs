//! Task use-case service.
//!
//! # Responsibility
//! - Apply request validation and business rules before touching storage.
//! - Translate repository outcomes into response envelopes.
//!
//! # Invariants
//! - A request that fails validation never reaches the repository.
//! - Operations never return `Err`; failures become failed responses.
//! - Update re-reads the stored task and merges only the fields the request
//!   sets; the repository receives a complete task.
//! - Created tasks always start as `Pending`.

use crate::api::response::StdResponse;
use crate::api::task_api::{
    CreateTaskRequest, CreateTaskResponse, GetBulkTasksResponse, GetTaskResponse, TaskPatch,
    UpdateTaskRequest,
};
use crate::context::RequestContext;
use crate::model::task::Task;
use crate::model::time::Time;
use crate::repo::task_repo::TaskRepository;
use crate::repo::RepoError;
use log::{info, warn};
use std::sync::Arc;

/// Task CRUD entry points for the routing layer.
pub struct TaskService {
    repo: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self { repo }
    }

    /// Validates and stores a new `Pending` task.
    pub fn create_task(
        &self,
        ctx: &RequestContext,
        request: &CreateTaskRequest,
    ) -> CreateTaskResponse {
        let now = Time::now();
        let draft = match request.parse(&now) {
            Ok(draft) => draft,
            Err(err) => {
                log_rejected(ctx, "task_create", "validation");
                return CreateTaskResponse::failed(err);
            }
        };

        match self.repo.add(ctx, &draft.into_task(now)) {
            Ok(task_id) => {
                info!(
                    "event=task_create module=service status=ok request_id={} task_id={task_id}",
                    ctx.request_id()
                );
                CreateTaskResponse::created(task_id)
            }
            Err(err) => {
                log_repo_error(ctx, "task_create", &err);
                CreateTaskResponse::failed(err)
            }
        }
    }

    pub fn get_task(&self, ctx: &RequestContext, title: &str) -> GetTaskResponse {
        match self.repo.get_by_title(ctx, title) {
            Ok(task) => GetTaskResponse::found(task),
            Err(err) => {
                log_repo_error(ctx, "task_get", &err);
                GetTaskResponse::failed(err)
            }
        }
    }

    /// Every stored task; an empty store is a successful empty list.
    pub fn get_all_tasks(&self, ctx: &RequestContext) -> GetBulkTasksResponse {
        match self.repo.get_all(ctx) {
            Ok(tasks) => GetBulkTasksResponse::found(tasks),
            Err(err) => {
                log_repo_error(ctx, "task_list", &err);
                GetBulkTasksResponse::failed(err)
            }
        }
    }

    /// Merges the request's non-empty fields into the stored task.
    pub fn update_task(&self, ctx: &RequestContext, request: &UpdateTaskRequest) -> StdResponse {
        let patch = match request.parse(&Time::now()) {
            Ok(patch) => patch,
            Err(err) => {
                log_rejected(ctx, "task_update", "validation");
                return StdResponse::failed(err);
            }
        };

        let mut task = match self.repo.get_by_title(ctx, &request.title) {
            Ok(task) => task,
            Err(err) => {
                log_repo_error(ctx, "task_update", &err);
                return StdResponse::failed(err);
            }
        };
        merge(&mut task, patch);

        match self.repo.update(ctx, &task) {
            Ok(()) => {
                info!(
                    "event=task_update module=service status=ok request_id={} task_id={}",
                    ctx.request_id(),
                    task.rowid
                );
                StdResponse::ok()
            }
            Err(err) => {
                log_repo_error(ctx, "task_update", &err);
                StdResponse::failed(err)
            }
        }
    }

    /// Resolves `title` to an id, then deletes by id.
    pub fn delete_task(&self, ctx: &RequestContext, title: &str) -> StdResponse {
        let task = match self.repo.get_by_title(ctx, title) {
            Ok(task) => task,
            Err(err) => {
                log_repo_error(ctx, "task_delete", &err);
                return StdResponse::failed(err);
            }
        };

        match self.repo.delete(ctx, task.rowid) {
            Ok(()) => {
                info!(
                    "event=task_delete module=service status=ok request_id={} task_id={}",
                    ctx.request_id(),
                    task.rowid
                );
                StdResponse::ok()
            }
            Err(err) => {
                log_repo_error(ctx, "task_delete", &err);
                StdResponse::failed(err)
            }
        }
    }
}

fn merge(task: &mut Task, patch: TaskPatch) {
    if let Some(description) = patch.description {
        task.description = description;
    }
    if let Some(due_date) = patch.due_date {
        task.due_date = due_date;
    }
    if let Some(priority) = patch.priority {
        task.priority = priority;
    }
    if let Some(effort) = patch.effort {
        task.effort = effort;
    }
    if let Some(status) = patch.status {
        task.status = status;
    }
}

fn log_rejected(ctx: &RequestContext, event: &str, code: &str) {
    warn!(
        "event={event} module=service status=error request_id={} error_code={code}",
        ctx.request_id()
    );
}

fn log_repo_error(ctx: &RequestContext, event: &str, err: &RepoError) {
    let code = match err {
        RepoError::NotFound { .. } => "not_found",
        RepoError::AlreadyExists { .. } => "already_exists",
        RepoError::Db(_) => "db_error",
    };
    log_rejected(ctx, event, code);
}
