//! Cross-cutting error types for Flora.
//!
//! These errors originate in pure code (field patches, state transitions).
//! Storage errors live in `flora-db`, which converts `CoreError` into its own
//! `DatabaseError` so callers see a single taxonomy.

use thiserror::Error;

/// Errors that can be raised by any Flora crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A state machine transition was attempted that is not allowed.
    #[error("Invalid state transition: {entity_type} {id} from {from} to {to}")]
    InvalidTransition {
        entity_type: String,
        id: String,
        from: String,
        to: String,
    },

    /// A field name outside the editable allow-list was supplied.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Data failed validation (schema, format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
