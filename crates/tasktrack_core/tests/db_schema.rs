use tasktrack_core::db::{open_db, open_db_in_memory, DbError, Handler, Value};

#[test]
fn open_db_in_memory_applies_schema() {
    let handler = open_db_in_memory().unwrap();

    assert_table_exists(&handler, "task");
    assert_table_exists(&handler, "reminder");
}

#[test]
fn reopening_database_keeps_schema_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.db");

    let first = open_db(&path).unwrap();
    first
        .execute(
            "INSERT INTO task (title, dueDate, priority) VALUES ('kept', '2099-01-01 10:00:00', 2);",
            &[],
        )
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    assert_table_exists(&second, "task");
    assert_table_exists(&second, "reminder");
    assert_eq!(task_count(&second), 1);
    assert_eq!(user_version(&second), 0, "schema is not versioned");
}

#[test]
fn schema_rejects_out_of_range_priority_and_unknown_status() {
    let handler = open_db_in_memory().unwrap();
    let insert = "INSERT INTO task (title, dueDate, status, priority)
                  VALUES (?1, '2099-01-01 10:00:00', ?2, ?3);";

    let bad_priority = handler
        .execute(insert, &[Value::from("a"), Value::from("Pending"), Value::Integer(9)])
        .unwrap_err();
    assert!(matches!(bad_priority, DbError::Constraint { .. }));

    let bad_status = handler
        .execute(insert, &[Value::from("b"), Value::from("Blocked"), Value::Integer(1)])
        .unwrap_err();
    assert!(matches!(bad_status, DbError::Constraint { .. }));
}

fn user_version(handler: &dyn Handler) -> i64 {
    handler
        .query_row("PRAGMA user_version;", &[])
        .unwrap()
        .unwrap()
        .get_index(0)
        .unwrap()
}

fn task_count(handler: &dyn Handler) -> i64 {
    handler
        .query_row("SELECT COUNT(*) FROM task;", &[])
        .unwrap()
        .unwrap()
        .get_index(0)
        .unwrap()
}

fn assert_table_exists(handler: &dyn Handler, table_name: &str) {
    let exists: i64 = handler
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            &[Value::from(table_name)],
        )
        .unwrap()
        .unwrap()
        .get_index(0)
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
