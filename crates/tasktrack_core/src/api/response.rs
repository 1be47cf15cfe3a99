//! Response envelope shared by every service operation.
//!
//! # Invariants
//! - A failed response carries at least one error; a successful one carries none.
//!   `add_error` keeps this by marking the response failed.
//! - `Response::equals` compares only the success flag, never error contents.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error message that serializes as a plain JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiError(String);

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }

    /// Wraps the display text of any error.
    pub fn from_error(err: &dyn Error) -> Self {
        Self(err.to_string())
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for ApiError {}

impl From<&str> for ApiError {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ApiError {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<crate::repo::RepoError> for ApiError {
    fn from(err: crate::repo::RepoError) -> Self {
        Self::from_error(&err)
    }
}

/// Capabilities every response type exposes.
pub trait Response: Display {
    fn envelope(&self) -> &StdResponse;
    fn envelope_mut(&mut self) -> &mut StdResponse;

    fn success(&self) -> bool {
        self.envelope().successful
    }

    fn errors(&self) -> &[ApiError] {
        &self.envelope().errors
    }

    /// Appends `err` and marks the response failed.
    fn add_error(&mut self, err: ApiError) {
        let envelope = self.envelope_mut();
        envelope.successful = false;
        envelope.errors.push(err);
    }

    /// Two responses are equal when both succeeded or both failed.
    fn equals(&self, other: &dyn Response) -> bool {
        self.success() == other.success()
    }
}

/// Success flag plus accumulated errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdResponse {
    pub successful: bool,
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

impl StdResponse {
    pub fn ok() -> Self {
        Self {
            successful: true,
            errors: Vec::new(),
        }
    }

    pub fn failed(err: impl Into<ApiError>) -> Self {
        Self {
            successful: false,
            errors: vec![err.into()],
        }
    }
}

impl Default for StdResponse {
    fn default() -> Self {
        Self::ok()
    }
}

impl Response for StdResponse {
    fn envelope(&self) -> &StdResponse {
        self
    }

    fn envelope_mut(&mut self) -> &mut StdResponse {
        self
    }
}

impl Display for StdResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write_json(f, self)
    }
}

/// Writes the canonical JSON form of `value`.
pub(crate) fn write_json<T: Serialize>(f: &mut Formatter<'_>, value: &T) -> std::fmt::Result {
    let json = serde_json::to_string(value).map_err(|_| std::fmt::Error)?;
    f.write_str(&json)
}
