use tasktrack_core::model::time::TimeParseError;
use tasktrack_core::{Duration, Priority, Status, Task, Time};

#[test]
fn canonical_durations_reserialize_exactly() {
    for text in [
        "0s", "1ns", "999ns", "1.5µs", "250ms", "1.001s", "45s", "1m0s", "1m1.5s", "2h0m0s",
        "24h0m0s", "1h30m0s", "-1m1s", "2562047h47m16.854775807s",
    ] {
        let parsed = Duration::parse(text).unwrap();
        assert_eq!(parsed.to_string(), text, "duration {text} did not round-trip");
    }
}

#[test]
fn canonical_timestamps_reserialize_exactly() {
    for text in [
        "2000-02-29 00:00:00",
        "2024-12-31 23:59:59",
        "2099-01-01 10:00:00",
        "1970-01-01 00:00:00",
    ] {
        let parsed = Time::parse(text).unwrap();
        assert_eq!(parsed.to_string(), text, "timestamp {text} did not round-trip");
    }
}

#[test]
fn timestamps_outside_the_layout_are_rejected() {
    for text in [
        "2024-12-31T23:59:59",
        "2024-12-31 23:59",
        "2024-02-30 10:00:00",
        "2024-12-31 23:59:59.5",
        " 2024-12-31 23:59:59",
    ] {
        let err = Time::parse(text).unwrap_err();
        assert!(
            matches!(
                err,
                TimeParseError::Layout(..) | TimeParseError::NotCanonical(_)
            ),
            "{text} should be rejected"
        );
    }
}

#[test]
fn task_json_uses_wire_field_names_and_canonical_text() {
    let mut task = Task::new(
        "Write spec",
        Time::parse("2099-01-01 10:00:00").unwrap(),
        Priority::new(3).unwrap(),
        Time::parse("2024-01-01 08:00:00").unwrap(),
    );
    task.effort = Duration::parse("2h").unwrap();
    task.status = Status::InProgress;

    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "rowid": 0,
            "title": "Write spec",
            "description": "",
            "dueDate": "2099-01-01 10:00:00",
            "status": "In-Progress",
            "priority": 3,
            "effort": "2h0m0s",
            "created": "2024-01-01 08:00:00"
        })
    );

    let decoded: Task = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, task);
}

#[test]
fn task_json_rejects_out_of_range_priority() {
    let json = r#"{"rowid":1,"title":"t","description":"","dueDate":"2099-01-01 10:00:00",
        "status":"Pending","priority":9,"effort":"1h0m0s","created":"2024-01-01 08:00:00"}"#;
    assert!(serde_json::from_str::<Task>(json).is_err());
}

#[test]
fn fractional_durations_resolve_to_exact_nanoseconds() {
    assert_eq!(Duration::parse("1.5µs").unwrap().as_nanos(), 1_500);
    assert_eq!(Duration::parse("1.5h").unwrap(), Duration::from_mins(90));
    assert_eq!(Duration::parse("-1m1s").unwrap().as_nanos(), -61_000_000_000);
}
