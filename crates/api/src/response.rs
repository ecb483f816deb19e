//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Acknowledgement-only
//! endpoints (cancel, mark-read) use [`MessageResponse`] instead of an
//! ad-hoc `serde_json::json!` literal.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Acknowledgement envelope: `{ "message": ... }`.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
