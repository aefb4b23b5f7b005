//! Domain error taxonomy shared across crates.

use crate::types::DbId;

/// Domain-level error. The API layer maps each variant onto an HTTP
/// status in its `AppError` wrapper.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity lookup by id came back empty.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Input failed domain validation.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The operation conflicts with existing state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The caller is authenticated but not allowed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// An unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}
