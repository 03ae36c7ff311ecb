//! Domain error type shared across the workspace.

use crate::types::DbId;

/// Domain-level errors surfaced by core operations.
///
/// Every core operation returns exactly one of these kinds; the API layer
/// maps them to transport status codes. Transient persistence failures are
/// reported as [`CoreError::StoreUnavailable`] and are never retried inside
/// the core — retry/backoff policy belongs to the caller.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The referenced entity does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// The operation would violate the single-active-session invariant.
    #[error("{0}")]
    Conflict(String),

    /// The entity is not in the state the operation requires.
    #[error("{0}")]
    InvalidState(String),

    /// Malformed input rejected at the core boundary.
    #[error("{0}")]
    Validation(String),

    /// The backing store failed; the operation may be retried by the caller.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

/// Convenience alias for core operation results.
pub type CoreResult<T> = Result<T, CoreError>;
