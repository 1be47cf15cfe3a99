//! Core domain logic for the task tracker.
//! This crate is the single source of truth for task invariants.

pub mod api;
pub mod config;
pub mod container;
pub mod context;
pub mod db;
pub mod init;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use api::{
    ApiError, CreateTaskRequest, CreateTaskResponse, GetBulkTasksResponse, GetTaskResponse,
    Request, Response, StdResponse, UpdateTaskRequest,
};
pub use config::{ConfigError, TaskConfig};
pub use container::Container;
pub use context::RequestContext;
pub use db::{open_db, open_db_in_memory, DbError, Handler, SqliteHandler};
pub use init::{BuildArgs, Builder, InitError, InitResult, Singleton};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::reminder::{Reminder, ReminderId};
pub use model::task::{Priority, Status, Task, TaskId};
pub use model::time::{Duration, Time};
pub use repo::reminder_repo::ReminderRepository;
pub use repo::task_repo::TaskRepository;
pub use repo::{RepoError, RepoResult};
pub use service::TaskService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
