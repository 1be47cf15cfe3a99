//! Per-request context threaded through repository and service calls.
//!
//! The core only propagates it: nothing here enforces deadlines or retries.

use uuid::Uuid;

/// Correlation data for one inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    request_id: Uuid,
}

impl RequestContext {
    /// Creates a context with a fresh random request id.
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
        }
    }

    /// Creates a context carrying an id assigned by the caller (e.g. a
    /// request header forwarded by the routing layer).
    pub fn with_request_id(request_id: Uuid) -> Self {
        Self { request_id }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
