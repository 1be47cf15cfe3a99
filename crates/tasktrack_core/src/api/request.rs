//! Request capability and the boundary decode helper.

use crate::api::response::ApiError;
use serde::de::DeserializeOwned;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Capabilities every request type exposes.
pub trait Request: Display {
    /// Checks field-level rules; returns the first violation found.
    fn validate(&self) -> Result<(), ApiError>;
}

/// Failure to turn a request body into a valid request.
#[derive(Debug)]
pub enum DecodeError {
    /// Body is not JSON of the expected shape.
    Malformed(serde_json::Error),
    /// Body decoded but failed validation.
    Invalid(ApiError),
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(err) => write!(f, "malformed request body: {err}"),
            Self::Invalid(err) => write!(f, "invalid request: {err}"),
        }
    }
}

impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(err) => Some(err),
            Self::Invalid(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err)
    }
}

/// Decodes a JSON body into `R` and validates it.
///
/// The routing layer maps every `DecodeError` to a client error status.
pub fn decode_and_validate<R>(body: &str) -> Result<R, DecodeError>
where
    R: Request + DeserializeOwned,
{
    let request: R = serde_json::from_str(body)?;
    request.validate().map_err(DecodeError::Invalid)?;
    Ok(request)
}
