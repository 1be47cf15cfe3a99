use std::sync::Arc;
use tasktrack_core::db::{open_db_in_memory, Handler};
use tasktrack_core::repo::memory::InMemoryReminderRepository;
use tasktrack_core::repo::mock::{MockReminderRepository, ReminderCall};
use tasktrack_core::repo::reminder_repo::SqliteReminderRepository;
use tasktrack_core::repo::task_repo::SqliteTaskRepository;
use tasktrack_core::{
    Priority, Reminder, ReminderRepository, RepoError, RequestContext, Task, TaskRepository, Time,
};

struct SqliteStore {
    tasks: SqliteTaskRepository,
    reminders: SqliteReminderRepository,
}

fn sqlite_store() -> SqliteStore {
    let handler: Arc<dyn Handler> = Arc::new(open_db_in_memory().unwrap());
    SqliteStore {
        tasks: SqliteTaskRepository::new(Arc::clone(&handler)),
        reminders: SqliteReminderRepository::new(handler),
    }
}

fn task(title: &str) -> Task {
    Task::new(
        title,
        Time::parse("2099-01-01 10:00:00").unwrap(),
        Priority::new(2).unwrap(),
        Time::parse("2024-01-01 00:00:00").unwrap(),
    )
}

fn reminder_time() -> Time {
    Time::parse("2099-01-08 10:00:00").unwrap()
}

#[test]
fn sqlite_reminder_roundtrip_and_update() {
    let store = sqlite_store();
    let ctx = RequestContext::new();
    let task_id = store.tasks.add(&ctx, &task("Learn SQL")).unwrap();

    let mut reminder = Reminder::new(task_id, reminder_time());
    reminder.notes = "revisit joins".to_string();
    reminder.rowid = store.reminders.add(&ctx, &reminder).unwrap();

    let loaded = store.reminders.get_for_task(&ctx, task_id).unwrap();
    assert_eq!(loaded, reminder);

    reminder.processed = true;
    store.reminders.update(&ctx, &reminder).unwrap();
    assert!(store.reminders.get_for_task(&ctx, task_id).unwrap().processed);
}

#[test]
fn sqlite_rejects_second_reminder_for_task() {
    let store = sqlite_store();
    let ctx = RequestContext::new();
    let task_id = store.tasks.add(&ctx, &task("Learn SQL")).unwrap();

    store
        .reminders
        .add(&ctx, &Reminder::new(task_id, reminder_time()))
        .unwrap();
    let err = store
        .reminders
        .add(&ctx, &Reminder::new(task_id, reminder_time()))
        .unwrap_err();
    assert!(err.is_already_exists(), "unexpected error: {err}");
}

#[test]
fn sqlite_reminder_for_unknown_task_is_not_found() {
    let store = sqlite_store();
    let err = store
        .reminders
        .add(&RequestContext::new(), &Reminder::new(42, reminder_time()))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "task", .. }));
}

#[test]
fn deleting_task_cascades_to_reminder() {
    let store = sqlite_store();
    let ctx = RequestContext::new();
    let task_id = store.tasks.add(&ctx, &task("Learn SQL")).unwrap();
    store
        .reminders
        .add(&ctx, &Reminder::new(task_id, reminder_time()))
        .unwrap();

    store.tasks.delete(&ctx, task_id).unwrap();
    assert!(store
        .reminders
        .get_for_task(&ctx, task_id)
        .unwrap_err()
        .is_not_found());
}

#[test]
fn in_memory_reminders_follow_same_rules() {
    let repo = InMemoryReminderRepository::new();
    let ctx = RequestContext::new();

    let id = repo.add(&ctx, &Reminder::new(7, reminder_time())).unwrap();
    assert!(repo
        .add(&ctx, &Reminder::new(7, reminder_time()))
        .unwrap_err()
        .is_already_exists());

    repo.delete(&ctx, id).unwrap();
    assert!(repo.get_for_task(&ctx, 7).unwrap_err().is_not_found());
    assert!(repo.delete(&ctx, id).unwrap_err().is_not_found());
}

#[test]
fn mock_reminder_defaults_to_not_found_and_records_calls() {
    let mock = MockReminderRepository::new();
    let ctx = RequestContext::new();

    let err = mock.get_for_task(&ctx, 7).unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err}");
    assert_eq!(mock.calls(), vec![ReminderCall::GetForTask(7)]);
}

#[test]
fn mock_reminder_uses_installed_replies_in_call_order() {
    let stored = Reminder::new(7, reminder_time());
    let reply = stored.clone();
    let mock = MockReminderRepository::new()
        .on_get_for_task(move |_| Ok(reply.clone()))
        .on_add(|reminder| {
            Err(RepoError::already_exists(
                "reminder",
                format!("task #{}", reminder.task_id),
            ))
        });
    let ctx = RequestContext::new();

    assert_eq!(mock.get_for_task(&ctx, 7).unwrap(), stored);
    let mut second = Reminder::new(7, reminder_time());
    second.notes = "again".to_string();
    assert!(mock.add(&ctx, &second).unwrap_err().is_already_exists());

    let mut done = stored.clone();
    done.processed = true;
    mock.update(&ctx, &done).unwrap();

    assert_eq!(
        mock.calls(),
        vec![
            ReminderCall::GetForTask(7),
            ReminderCall::Add(second),
            ReminderCall::Update(done),
        ]
    );
}
