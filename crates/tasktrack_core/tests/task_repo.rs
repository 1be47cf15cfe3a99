use std::sync::Arc;
use tasktrack_core::db::{open_db, open_db_in_memory, Handler};
use tasktrack_core::repo::memory::InMemoryTaskRepository;
use tasktrack_core::repo::task_repo::SqliteTaskRepository;
use tasktrack_core::{
    Duration, Priority, RepoError, RequestContext, Status, Task, TaskRepository, Time,
};

fn sqlite_repo() -> SqliteTaskRepository {
    let handler: Arc<dyn Handler> = Arc::new(open_db_in_memory().unwrap());
    SqliteTaskRepository::new(handler)
}

fn task(title: &str) -> Task {
    Task::new(
        title,
        Time::parse("2099-01-01 10:00:00").unwrap(),
        Priority::new(3).unwrap(),
        Time::parse("2024-03-04 05:06:07").unwrap(),
    )
}

/// Runs the shared repository contract against one implementation.
fn check_contract(repo: &dyn TaskRepository) {
    let ctx = RequestContext::new();
    assert!(repo.get_all(&ctx).unwrap().is_empty());

    let mut first = task("Write spec");
    first.description = "outline every module".to_string();
    first.effort = Duration::from_hours(2);
    let id = repo.add(&ctx, &first).unwrap();

    let loaded = repo.get_by_title(&ctx, "Write spec").unwrap();
    first.rowid = id;
    assert_eq!(loaded, first);

    let err = repo.add(&ctx, &task("Write spec")).unwrap_err();
    assert!(err.is_already_exists(), "unexpected error: {err}");
    assert_eq!(repo.get_all(&ctx).unwrap().len(), 1);

    let second_id = repo.add(&ctx, &task("Review plan")).unwrap();
    assert!(second_id > id);
    let titles: Vec<String> = repo
        .get_all(&ctx)
        .unwrap()
        .into_iter()
        .map(|task| task.title)
        .collect();
    assert_eq!(titles, ["Write spec", "Review plan"]);

    let mut changed = loaded.clone();
    changed.status = Status::Done;
    changed.created = Time::parse("2000-01-01 00:00:00").unwrap();
    repo.update(&ctx, &changed).unwrap();
    let reloaded = repo.get_by_title(&ctx, "Write spec").unwrap();
    assert_eq!(reloaded.status, Status::Done);
    assert_eq!(reloaded.created, loaded.created, "created is immutable");

    let mut renamed = reloaded.clone();
    renamed.title = "Review plan".to_string();
    assert!(repo.update(&ctx, &renamed).unwrap_err().is_already_exists());

    let mut ghost = task("Ghost");
    ghost.rowid = 9_999;
    assert!(repo.update(&ctx, &ghost).unwrap_err().is_not_found());

    assert!(repo.delete(&ctx, 9_999).unwrap_err().is_not_found());
    assert!(repo
        .delete_by_title(&ctx, "Ghost")
        .unwrap_err()
        .is_not_found());
    assert_eq!(repo.get_all(&ctx).unwrap().len(), 2);

    repo.delete(&ctx, id).unwrap();
    repo.delete_by_title(&ctx, "Review plan").unwrap();
    assert!(repo.get_all(&ctx).unwrap().is_empty());
    assert!(matches!(
        repo.get_by_title(&ctx, "Write spec").unwrap_err(),
        RepoError::NotFound { entity: "task", .. }
    ));
}

#[test]
fn sqlite_repository_honors_contract() {
    check_contract(&sqlite_repo());
}

#[test]
fn in_memory_repository_honors_contract() {
    check_contract(&InMemoryTaskRepository::new());
}

#[test]
fn in_memory_ids_start_at_zero() {
    let repo = InMemoryTaskRepository::new();
    let ctx = RequestContext::new();
    assert_eq!(repo.add(&ctx, &task("a")).unwrap(), 0);
    assert_eq!(repo.add(&ctx, &task("b")).unwrap(), 1);
    repo.delete(&ctx, 1).unwrap();
    assert_eq!(repo.add(&ctx, &task("c")).unwrap(), 2, "ids are never reused");
    assert_eq!(repo.len(), 2);
}

#[test]
fn sqlite_ids_are_never_reused() {
    let repo = sqlite_repo();
    let ctx = RequestContext::new();
    let first = repo.add(&ctx, &task("a")).unwrap();
    repo.delete(&ctx, first).unwrap();
    let second = repo.add(&ctx, &task("b")).unwrap();
    assert!(second > first);
}

#[test]
fn sqlite_tasks_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.db");
    let ctx = RequestContext::new();

    {
        let handler: Arc<dyn Handler> = Arc::new(open_db(&path).unwrap());
        let repo = SqliteTaskRepository::new(handler);
        repo.add(&ctx, &task("Persist me")).unwrap();
    }

    let handler: Arc<dyn Handler> = Arc::new(open_db(&path).unwrap());
    let repo = SqliteTaskRepository::new(handler);
    let loaded = repo.get_by_title(&ctx, "Persist me").unwrap();
    assert_eq!(loaded.effort.to_string(), "24h0m0s");
    assert_eq!(loaded.due_date.to_string(), "2099-01-01 10:00:00");
}

#[test]
fn corrupt_row_is_reported_not_panicked() {
    let handler: Arc<dyn Handler> = Arc::new(open_db_in_memory().unwrap());
    handler
        .execute(
            "INSERT INTO task (title, dueDate, priority, effort)
             VALUES ('Broken', 'next tuesday', 2, '1h');",
            &[],
        )
        .unwrap();

    let repo = SqliteTaskRepository::new(handler);
    let err = repo
        .get_by_title(&RequestContext::new(), "Broken")
        .unwrap_err();
    assert!(matches!(err, RepoError::Db(_)), "unexpected error: {err}");
}
