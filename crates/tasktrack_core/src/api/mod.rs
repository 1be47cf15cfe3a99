//! Request/response envelope types consumed by the routing layer.
//!
//! # Responsibility
//! - Define the `Request`/`Response` capabilities and the error value type.
//! - Define the wire shapes of the task operations.
//!
//! # Invariants
//! - `ApiError` serializes as a plain JSON string.
//! - Failed responses carry a non-empty error list and a false success flag.

pub mod request;
pub mod response;
pub mod task_api;

pub use request::{decode_and_validate, DecodeError, Request};
pub use response::{ApiError, Response, StdResponse};
pub use task_api::{
    CreateTaskRequest, CreateTaskResponse, GetBulkTasksResponse, GetTaskResponse, NewTask,
    TaskPatch, UpdateTaskRequest, ValidationError,
};
