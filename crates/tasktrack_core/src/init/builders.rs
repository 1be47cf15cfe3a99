//! Construction strategies for repositories and services.

use crate::db::{Handler, HandlerKind};
use crate::init::{BuildArgs, Builder, InitResult};
use crate::repo::memory::{InMemoryReminderRepository, InMemoryTaskRepository};
use crate::repo::reminder_repo::{ReminderRepository, SqliteReminderRepository};
use crate::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use crate::service::task_service::TaskService;
use std::sync::Arc;

/// Builds a SQLite task repository from `[Arc<dyn Handler>]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteTaskRepositoryBuilder;

impl Builder for SqliteTaskRepositoryBuilder {
    type Output = dyn TaskRepository;

    fn name(&self) -> &str {
        "TaskRepo"
    }

    fn build(&self, args: BuildArgs) -> InitResult<Arc<dyn TaskRepository>> {
        let handler = single_handler(args)?;
        match handler.kind() {
            HandlerKind::Sqlite => Ok(Arc::new(SqliteTaskRepository::new(handler))),
        }
    }
}

/// Builds a SQLite reminder repository from `[Arc<dyn Handler>]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteReminderRepositoryBuilder;

impl Builder for SqliteReminderRepositoryBuilder {
    type Output = dyn ReminderRepository;

    fn name(&self) -> &str {
        "ReminderRepo"
    }

    fn build(&self, args: BuildArgs) -> InitResult<Arc<dyn ReminderRepository>> {
        let handler = single_handler(args)?;
        match handler.kind() {
            HandlerKind::Sqlite => Ok(Arc::new(SqliteReminderRepository::new(handler))),
        }
    }
}

/// Builds an empty in-memory task repository; takes no arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct InMemoryTaskRepositoryBuilder;

impl Builder for InMemoryTaskRepositoryBuilder {
    type Output = dyn TaskRepository;

    fn name(&self) -> &str {
        "TaskRepo"
    }

    fn build(&self, args: BuildArgs) -> InitResult<Arc<dyn TaskRepository>> {
        args.expect_len(0)?;
        Ok(Arc::new(InMemoryTaskRepository::new()))
    }
}

/// Builds an empty in-memory reminder repository; takes no arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct InMemoryReminderRepositoryBuilder;

impl Builder for InMemoryReminderRepositoryBuilder {
    type Output = dyn ReminderRepository;

    fn name(&self) -> &str {
        "ReminderRepo"
    }

    fn build(&self, args: BuildArgs) -> InitResult<Arc<dyn ReminderRepository>> {
        args.expect_len(0)?;
        Ok(Arc::new(InMemoryReminderRepository::new()))
    }
}

/// Builds the task service from `[Arc<dyn TaskRepository>]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskServiceBuilder;

impl Builder for TaskServiceBuilder {
    type Output = TaskService;

    fn name(&self) -> &str {
        "TaskService"
    }

    fn build(&self, mut args: BuildArgs) -> InitResult<Arc<TaskService>> {
        args.expect_len(1)?;
        let repo: Arc<dyn TaskRepository> = args.take(0)?;
        Ok(Arc::new(TaskService::new(repo)))
    }
}

type BuildFn<T> = Box<dyn Fn(BuildArgs) -> InitResult<Arc<T>> + Send + Sync>;

/// Strategy backed by a closure, e.g. to install a mock repository.
pub struct FnBuilder<T: ?Sized> {
    name: String,
    build: BuildFn<T>,
}

impl<T: ?Sized> FnBuilder<T> {
    pub fn new(
        name: impl Into<String>,
        build: impl Fn(BuildArgs) -> InitResult<Arc<T>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            build: Box::new(build),
        }
    }
}

impl<T: ?Sized + Send + Sync> Builder for FnBuilder<T> {
    type Output = T;

    fn name(&self) -> &str {
        &self.name
    }

    fn build(&self, args: BuildArgs) -> InitResult<Arc<T>> {
        (self.build)(args)
    }
}

fn single_handler(mut args: BuildArgs) -> InitResult<Arc<dyn Handler>> {
    args.expect_len(1)?;
    args.take::<Arc<dyn Handler>>(0)
}

#[cfg(test)]
mod tests {
    use super::{FnBuilder, InMemoryTaskRepositoryBuilder, SqliteTaskRepositoryBuilder};
    use crate::db::{open_db_in_memory, Handler};
    use crate::init::{BuildArgs, Builder, InitError};
    use crate::repo::mock::MockTaskRepository;
    use crate::repo::task_repo::TaskRepository;
    use std::sync::Arc;

    #[test]
    fn sqlite_builder_requires_one_handler() {
        let err = SqliteTaskRepositoryBuilder
            .build(BuildArgs::new())
            .err()
            .expect("missing handler must fail");
        assert!(matches!(
            err,
            InitError::ArgumentMismatch {
                expected: 1,
                actual: 0
            }
        ));
    }

    #[test]
    fn sqlite_builder_rejects_concrete_handler_type() {
        let handler = Arc::new(open_db_in_memory().expect("open in-memory db"));
        let err = SqliteTaskRepositoryBuilder
            .build(BuildArgs::new().with(handler))
            .err()
            .expect("concrete handler arc is not the erased handler type");
        assert!(matches!(err, InitError::InvalidType { index: 0, .. }));
    }

    #[test]
    fn sqlite_builder_accepts_erased_handler() {
        let handler: Arc<dyn Handler> = Arc::new(open_db_in_memory().expect("open in-memory db"));
        SqliteTaskRepositoryBuilder
            .build(BuildArgs::new().with(handler))
            .expect("erased handler should build");
    }

    #[test]
    fn in_memory_builder_rejects_arguments() {
        let err = InMemoryTaskRepositoryBuilder
            .build(BuildArgs::new().with(1_i64))
            .err()
            .expect("in-memory builder takes no arguments");
        assert!(matches!(err, InitError::ArgumentMismatch { expected: 0, .. }));
    }

    #[test]
    fn fn_builder_runs_closure() {
        let builder: FnBuilder<dyn TaskRepository> = FnBuilder::new("MockTaskRepo", |args| {
            args.expect_len(0)?;
            Ok(Arc::new(MockTaskRepository::new()) as Arc<dyn TaskRepository>)
        });
        assert_eq!(builder.name(), "MockTaskRepo");
        builder
            .build(BuildArgs::new())
            .expect("closure strategy should build");
    }
}
