//! Domain error taxonomy shared across the workspace.

use crate::types::DbId;

/// A domain-level error.
///
/// The first four variants are expected client errors: they carry a short
/// human-readable reason, are surfaced directly, and are never logged as
/// faults. `Internal` is the only server-fault variant.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The referenced entity does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// The caller's role or ownership does not permit the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The operation is illegal in the job's current lifecycle state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Malformed input (e.g. a non-numeric position, a missing
    /// cancellation reason).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Missing or invalid credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// An unexpected failure; surfaced as a generic server fault.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a `Forbidden` error with a formatted message.
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// Shorthand for an `InvalidState` error with a formatted message.
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }
}
