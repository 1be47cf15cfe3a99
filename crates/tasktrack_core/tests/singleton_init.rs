use std::sync::{Arc, Barrier};
use tasktrack_core::db::{open_db_in_memory, Handler};
use tasktrack_core::init::{
    FnBuilder, InMemoryReminderRepositoryBuilder, InMemoryTaskRepositoryBuilder,
    SqliteTaskRepositoryBuilder,
};
use tasktrack_core::repo::mock::MockTaskRepository;
use tasktrack_core::{
    BuildArgs, Container, InitError, RequestContext, Singleton, TaskConfig, TaskRepository,
};

#[test]
fn concurrent_builds_publish_exactly_one_instance() {
    let singleton = Singleton::new(InMemoryTaskRepositoryBuilder);
    let barrier = Barrier::new(2);

    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..2)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    singleton.build(BuildArgs::new())
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    let mut winners = Vec::new();
    let mut rejected = 0;
    for result in results {
        match result {
            Ok(repo) => winners.push(repo),
            Err(InitError::AlreadyInitialized(name)) => {
                assert_eq!(name, "TaskRepo");
                rejected += 1;
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(winners.len(), 1);
    assert_eq!(rejected, 1);
    let published = singleton.get().unwrap();
    assert!(Arc::ptr_eq(&winners[0], &published));
}

#[test]
fn many_racing_builders_converge() {
    let singleton = Singleton::new(InMemoryTaskRepositoryBuilder);
    let successes = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| singleton.build(BuildArgs::new()).is_ok()))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|ok| *ok)
            .count()
    });
    assert_eq!(successes, 1);
    assert!(singleton.is_initialized());
}

#[test]
fn reading_before_build_observes_nothing() {
    let singleton = Singleton::new(SqliteTaskRepositoryBuilder);
    assert!(singleton.get().is_none());
}

#[test]
fn sqlite_builder_reports_argument_errors() {
    let singleton = Singleton::new(SqliteTaskRepositoryBuilder);

    let err = singleton
        .build(BuildArgs::new().with("not a handler"))
        .err()
        .unwrap();
    assert!(matches!(err, InitError::InvalidType { index: 0, .. }));

    let handler: Arc<dyn Handler> = Arc::new(open_db_in_memory().unwrap());
    let err = singleton
        .build(BuildArgs::new().with(Arc::clone(&handler)).with(handler))
        .err()
        .unwrap();
    assert!(matches!(
        err,
        InitError::ArgumentMismatch {
            expected: 1,
            actual: 2
        }
    ));
    assert!(!singleton.is_initialized());
}

#[test]
fn container_accepts_mock_strategy() {
    let container = Container::new(
        FnBuilder::new("TaskRepo", |args: BuildArgs| {
            args.expect_len(0)?;
            let mock = MockTaskRepository::new().on_get_all(|| Ok(Vec::new()));
            Ok(Arc::new(mock) as Arc<dyn TaskRepository>)
        }),
        InMemoryReminderRepositoryBuilder,
    );
    container.init_task_repository(BuildArgs::new()).unwrap();
    let service = container.init_task_service().unwrap();

    assert!(Arc::ptr_eq(&service, &container.task_service().unwrap()));
    assert!(service.get_all_tasks(&RequestContext::new()).tasks.is_empty());
    assert!(matches!(
        container.init_task_service().err().unwrap(),
        InitError::AlreadyInitialized(_)
    ));
}

#[test]
fn container_from_config_wires_sqlite() {
    let container = Container::from_config(&TaskConfig::new(":memory:", "sqlite3")).unwrap();
    assert!(container.task_repository().is_some());
    assert!(container.reminder_repository().is_some());
    assert!(container.task_service().is_some());
}

#[test]
fn container_from_config_rejects_unknown_backend() {
    let err = Container::from_config(&TaskConfig::new("tasks", "mongo"))
        .err()
        .unwrap();
    assert!(matches!(err, InitError::UnsupportedBackend(ref name) if name == "mongo"));
}
