use tasktrack_core::api::{decode_and_validate, DecodeError};
use tasktrack_core::{
    ApiError, CreateTaskRequest, CreateTaskResponse, GetBulkTasksResponse, Request, Response,
    StdResponse, UpdateTaskRequest,
};

#[test]
fn error_list_serializes_as_string_array() {
    let mut response = StdResponse::ok();
    response.add_error(ApiError::new("first"));
    response.add_error(ApiError::new("second"));

    let json: serde_json::Value = serde_json::to_value(&response).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"successful": false, "errors": ["first", "second"]})
    );
}

#[test]
fn failed_create_response_carries_negative_id() {
    let response = CreateTaskResponse::failed("task already exists: Write spec");
    assert_eq!(
        response.to_string(),
        r#"{"successful":false,"errors":["task already exists: Write spec"],"task_id":-1}"#
    );
}

#[test]
fn equality_is_defined_on_success_flag_only() {
    let created = CreateTaskResponse::created(4);
    let listed = GetBulkTasksResponse::found(Vec::new());
    assert!(created.equals(&listed));

    let failed_one = CreateTaskResponse::failed("one");
    let failed_two = StdResponse::failed("two");
    assert!(failed_one.equals(&failed_two));
    assert!(!failed_one.equals(&created));
}

#[test]
fn successful_response_has_no_errors() {
    let response = GetBulkTasksResponse::found(Vec::new());
    assert!(response.success());
    assert!(response.errors().is_empty());
}

#[test]
fn decode_accepts_valid_create_body() {
    let request: CreateTaskRequest = decode_and_validate(
        r#"{"title":"Write spec","dueDate":"2099-01-01 10:00:00","priority":3,"effort":"2h"}"#,
    )
    .unwrap();
    assert_eq!(request.title, "Write spec");
    assert_eq!(request.description, "");
}

#[test]
fn decode_distinguishes_malformed_from_invalid() {
    let malformed = decode_and_validate::<CreateTaskRequest>("{not json").unwrap_err();
    assert!(matches!(malformed, DecodeError::Malformed(_)));

    let invalid =
        decode_and_validate::<CreateTaskRequest>(r#"{"title":"Write spec","priority":3}"#)
            .unwrap_err();
    match invalid {
        DecodeError::Invalid(err) => assert_eq!(err.message(), "cannot have empty due date"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn update_body_accepts_capitalized_status_key() {
    let request: UpdateTaskRequest =
        decode_and_validate(r#"{"title":"Write spec","Status":"Done"}"#).unwrap();
    assert_eq!(request.status, "Done");
    assert!(request.validate().is_ok());
}

#[test]
fn request_display_is_json() {
    let request = UpdateTaskRequest {
        title: "Write spec".to_string(),
        ..UpdateTaskRequest::default()
    };
    let json: serde_json::Value = serde_json::from_str(&request.to_string()).unwrap();
    assert_eq!(json["title"], "Write spec");
    assert_eq!(json["status"], "");
}
