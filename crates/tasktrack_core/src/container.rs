//! Explicit wiring of repositories and services.
//!
//! # Responsibility
//! - Own one build-once slot per shared component.
//! - Wire components in dependency order: repositories first, then services.
//!
//! # Invariants
//! - Each slot is built at most once per container.
//! - The task service cannot be built before the task repository.
//! - Nothing is reachable through a global; callers hold the container.

use crate::config::{ConfigError, TaskConfig};
use crate::db::Handler;
use crate::init::{
    BuildArgs, Builder, InMemoryReminderRepositoryBuilder, InMemoryTaskRepositoryBuilder,
    InitError, InitResult, Singleton, SqliteReminderRepositoryBuilder,
    SqliteTaskRepositoryBuilder, TaskServiceBuilder,
};
use crate::repo::reminder_repo::ReminderRepository;
use crate::repo::task_repo::TaskRepository;
use crate::service::task_service::TaskService;
use log::info;
use std::sync::Arc;

pub type TaskRepositoryBuilder = Box<dyn Builder<Output = dyn TaskRepository>>;
pub type ReminderRepositoryBuilder = Box<dyn Builder<Output = dyn ReminderRepository>>;

/// Process-wide component registry, built once at startup.
#[derive(Debug)]
pub struct Container {
    task_repository: Singleton<TaskRepositoryBuilder>,
    reminder_repository: Singleton<ReminderRepositoryBuilder>,
    task_service: Singleton<TaskServiceBuilder>,
}

impl Container {
    /// Creates an empty container using the given repository strategies.
    pub fn new(
        task_repository: impl Builder<Output = dyn TaskRepository> + 'static,
        reminder_repository: impl Builder<Output = dyn ReminderRepository> + 'static,
    ) -> Self {
        Self {
            task_repository: Singleton::new(Box::new(task_repository) as TaskRepositoryBuilder),
            reminder_repository: Singleton::new(
                Box::new(reminder_repository) as ReminderRepositoryBuilder,
            ),
            task_service: Singleton::new(TaskServiceBuilder),
        }
    }

    /// Empty container with SQLite repository strategies.
    pub fn sqlite() -> Self {
        Self::new(SqliteTaskRepositoryBuilder, SqliteReminderRepositoryBuilder)
    }

    /// Fully wired container over a SQLite handler.
    pub fn bootstrap(handler: Arc<dyn Handler>) -> InitResult<Self> {
        let container = Self::sqlite();
        container.init_task_repository(BuildArgs::new().with(Arc::clone(&handler)))?;
        container.init_reminder_repository(BuildArgs::new().with(handler))?;
        container.init_task_service()?;
        info!("event=container_bootstrap module=container status=ok backend=sqlite");
        Ok(container)
    }

    /// Fully wired container over in-memory repositories.
    pub fn in_memory() -> InitResult<Self> {
        let container = Self::new(
            InMemoryTaskRepositoryBuilder,
            InMemoryReminderRepositoryBuilder,
        );
        container.init_task_repository(BuildArgs::new())?;
        container.init_reminder_repository(BuildArgs::new())?;
        container.init_task_service()?;
        info!("event=container_bootstrap module=container status=ok backend=memory");
        Ok(container)
    }

    /// Opens the configured datastore and wires everything over it.
    pub fn from_config(config: &TaskConfig) -> InitResult<Self> {
        let handler = config.open_handler().map_err(|err| match err {
            ConfigError::UnsupportedBackend(name) => InitError::UnsupportedBackend(name),
            other => InitError::build("TaskStore", other),
        })?;
        Self::bootstrap(handler)
    }

    pub fn init_task_repository(&self, args: BuildArgs) -> InitResult<Arc<dyn TaskRepository>> {
        self.task_repository.build(args)
    }

    pub fn init_reminder_repository(
        &self,
        args: BuildArgs,
    ) -> InitResult<Arc<dyn ReminderRepository>> {
        self.reminder_repository.build(args)
    }

    /// Builds the task service over the already-built task repository.
    pub fn init_task_service(&self) -> InitResult<Arc<TaskService>> {
        let repo = self
            .task_repository
            .get()
            .ok_or_else(|| InitError::NotInitialized(self.task_repository.name().to_string()))?;
        self.task_service.build(BuildArgs::new().with(repo))
    }

    pub fn task_repository(&self) -> Option<Arc<dyn TaskRepository>> {
        self.task_repository.get()
    }

    pub fn reminder_repository(&self) -> Option<Arc<dyn ReminderRepository>> {
        self.reminder_repository.get()
    }

    pub fn task_service(&self) -> Option<Arc<TaskService>> {
        self.task_service.get()
    }
}
