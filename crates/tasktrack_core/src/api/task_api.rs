//! Task request and response shapes.
//!
//! # Responsibility
//! - Decode loosely-typed request fields into domain values.
//! - Define the wire shape of every task operation's response.
//!
//! # Invariants
//! - Create requires title, priority and a future due date; effort defaults
//!   to 24h when absent.
//! - Update requires only the title. Empty or zero fields mean "leave
//!   unchanged"; a non-empty due date must still be valid and in the future.
//! - Title and description limits count characters, not bytes.

use crate::api::request::Request;
use crate::api::response::{write_json, ApiError, Response, StdResponse};
use crate::model::task::{
    Priority, Status, Task, TaskId, DEFAULT_EFFORT, DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS,
};
use crate::model::time::{Duration, Time, TimeParseError};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field-level request rule violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyTitle,
    TitleTooLong,
    DescriptionTooLong,
    PriorityMissing,
    PriorityOutOfRange(u8),
    DueDateMissing,
    InvalidDueDate(TimeParseError),
    DueDateNotInFuture,
    InvalidEffort(String),
    InvalidStatus(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => f.write_str("cannot have empty title"),
            Self::TitleTooLong => write!(
                f,
                "title length cannot be greater than {TITLE_MAX_CHARS}"
            ),
            Self::DescriptionTooLong => write!(
                f,
                "description length cannot be greater than {DESCRIPTION_MAX_CHARS}"
            ),
            Self::PriorityMissing => f.write_str("cannot have empty priority"),
            Self::PriorityOutOfRange(value) => write!(
                f,
                "priority {value} out of range; priorities range from {} (least) to {} (most)",
                Priority::MIN,
                Priority::MAX
            ),
            Self::DueDateMissing => f.write_str("cannot have empty due date"),
            Self::InvalidDueDate(err) => write!(f, "invalid due date: {err}"),
            Self::DueDateNotInFuture => f.write_str("due date has to be in future"),
            Self::InvalidEffort(value) => write!(f, "invalid duration `{value}`"),
            Self::InvalidStatus(value) => write!(
                f,
                "invalid status `{value}`; valid statuses are Pending, In-Progress and Done"
            ),
        }
    }
}

impl Error for ValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidDueDate(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::from_error(&err)
    }
}

/// Validated fields of a create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub due_date: Time,
    pub priority: Priority,
    pub effort: Duration,
}

impl NewTask {
    /// Pending task created at `created`.
    pub fn into_task(self, created: Time) -> Task {
        let mut task = Task::new(self.title, self.due_date, self.priority, created);
        task.description = self.description;
        task.effort = self.effort;
        task
    }
}

/// Validated fields of an update request; `None` leaves the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub description: Option<String>,
    pub due_date: Option<Time>,
    pub priority: Option<Priority>,
    pub effort: Option<Duration>,
    pub status: Option<Status>,
}

/// Body of the create operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
    #[serde(rename = "dueDate")]
    pub due_date: String,
    pub priority: u8,
    pub effort: String,
}

impl CreateTaskRequest {
    /// Validates against `now` and converts to domain values.
    pub fn parse(&self, now: &Time) -> Result<NewTask, ValidationError> {
        check_title(&self.title)?;
        check_description(&self.description)?;

        if self.priority == 0 {
            return Err(ValidationError::PriorityMissing);
        }
        let priority = parse_priority(self.priority)?;

        if self.due_date.is_empty() {
            return Err(ValidationError::DueDateMissing);
        }
        let due_date = parse_due_date(&self.due_date, now)?;

        let effort = if self.effort.is_empty() {
            DEFAULT_EFFORT
        } else {
            parse_effort(&self.effort)?
        };

        Ok(NewTask {
            title: self.title.clone(),
            description: self.description.clone(),
            due_date,
            priority,
            effort,
        })
    }
}

impl Request for CreateTaskRequest {
    fn validate(&self) -> Result<(), ApiError> {
        self.parse(&Time::now()).map(|_| ()).map_err(ApiError::from)
    }
}

impl Display for CreateTaskRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write_json(f, self)
    }
}

/// Body of the update operation. Only `title` is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateTaskRequest {
    pub title: String,
    pub description: String,
    #[serde(rename = "dueDate")]
    pub due_date: String,
    pub priority: u8,
    pub effort: String,
    #[serde(alias = "Status")]
    pub status: String,
}

impl UpdateTaskRequest {
    /// Validates against `now` and converts the set fields to domain values.
    pub fn parse(&self, now: &Time) -> Result<TaskPatch, ValidationError> {
        check_title(&self.title)?;
        check_description(&self.description)?;

        let mut patch = TaskPatch::default();
        if !self.description.is_empty() {
            patch.description = Some(self.description.clone());
        }
        if self.priority != 0 {
            patch.priority = Some(parse_priority(self.priority)?);
        }
        if !self.due_date.is_empty() {
            patch.due_date = Some(parse_due_date(&self.due_date, now)?);
        }
        if !self.effort.is_empty() {
            patch.effort = Some(parse_effort(&self.effort)?);
        }
        if !self.status.is_empty() {
            let status = self
                .status
                .parse::<Status>()
                .map_err(|err| ValidationError::InvalidStatus(err.0))?;
            patch.status = Some(status);
        }
        Ok(patch)
    }
}

impl Request for UpdateTaskRequest {
    fn validate(&self) -> Result<(), ApiError> {
        self.parse(&Time::now()).map(|_| ()).map_err(ApiError::from)
    }
}

impl Display for UpdateTaskRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write_json(f, self)
    }
}

/// Result of the create operation; `task_id` is -1 on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskResponse {
    #[serde(flatten)]
    pub response: StdResponse,
    pub task_id: TaskId,
}

impl CreateTaskResponse {
    pub fn created(task_id: TaskId) -> Self {
        Self {
            response: StdResponse::ok(),
            task_id,
        }
    }

    pub fn failed(err: impl Into<ApiError>) -> Self {
        Self {
            response: StdResponse::failed(err),
            task_id: -1,
        }
    }
}

/// Result of the single-task read; `task` is omitted on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTaskResponse {
    #[serde(flatten)]
    pub response: StdResponse,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<Task>,
}

impl GetTaskResponse {
    pub fn found(task: Task) -> Self {
        Self {
            response: StdResponse::ok(),
            task: Some(task),
        }
    }

    pub fn failed(err: impl Into<ApiError>) -> Self {
        Self {
            response: StdResponse::failed(err),
            task: None,
        }
    }
}

/// Result of the read-all operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetBulkTasksResponse {
    #[serde(flatten)]
    pub response: StdResponse,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl GetBulkTasksResponse {
    pub fn found(tasks: Vec<Task>) -> Self {
        Self {
            response: StdResponse::ok(),
            tasks,
        }
    }

    pub fn failed(err: impl Into<ApiError>) -> Self {
        Self {
            response: StdResponse::failed(err),
            tasks: Vec::new(),
        }
    }
}

impl Response for CreateTaskResponse {
    fn envelope(&self) -> &StdResponse {
        &self.response
    }

    fn envelope_mut(&mut self) -> &mut StdResponse {
        &mut self.response
    }
}

impl Response for GetTaskResponse {
    fn envelope(&self) -> &StdResponse {
        &self.response
    }

    fn envelope_mut(&mut self) -> &mut StdResponse {
        &mut self.response
    }
}

impl Response for GetBulkTasksResponse {
    fn envelope(&self) -> &StdResponse {
        &self.response
    }

    fn envelope_mut(&mut self) -> &mut StdResponse {
        &mut self.response
    }
}

impl Display for CreateTaskResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write_json(f, self)
    }
}

impl Display for GetTaskResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write_json(f, self)
    }
}

impl Display for GetBulkTasksResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write_json(f, self)
    }
}

fn check_title(title: &str) -> Result<(), ValidationError> {
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(ValidationError::TitleTooLong);
    }
    Ok(())
}

fn check_description(description: &str) -> Result<(), ValidationError> {
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(ValidationError::DescriptionTooLong);
    }
    Ok(())
}

fn parse_priority(value: u8) -> Result<Priority, ValidationError> {
    Priority::new(value).map_err(|err| ValidationError::PriorityOutOfRange(err.0))
}

fn parse_due_date(value: &str, now: &Time) -> Result<Time, ValidationError> {
    let due_date = Time::parse(value).map_err(ValidationError::InvalidDueDate)?;
    if !due_date.is_after(now) {
        return Err(ValidationError::DueDateNotInFuture);
    }
    Ok(due_date)
}

fn parse_effort(value: &str) -> Result<Duration, ValidationError> {
    Duration::parse(value).map_err(|_| ValidationError::InvalidEffort(value.to_string()))
}
