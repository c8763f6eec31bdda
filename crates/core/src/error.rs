//! Domain-level error type shared across the workspace.

use crate::types::DbId;

/// Errors produced by domain logic in `folio-core` and the service layer.
///
/// The API crate maps each variant onto an HTTP status in its `AppError`
/// `IntoResponse` implementation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CoreError {
    /// An entity lookup by id came back empty.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Input failed a validation or business rule ("unknown widget type",
    /// "portfolio id must be a valid identifier", ...).
    #[error("{0}")]
    Validation(String),

    /// A uniqueness or business-rule conflict ("community already has a
    /// portfolio for this user", slug exhaustion).
    #[error("{0}")]
    Conflict(String),

    /// Missing or invalid credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not allowed.
    #[error("{0}")]
    Forbidden(String),

    /// An unexpected internal failure. The message is logged server-side
    /// and never surfaced verbatim to clients.
    #[error("{0}")]
    Internal(String),
}
