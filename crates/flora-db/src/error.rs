//! Database and lifecycle error types for flora-db.

use flora_core::errors::CoreError;
use flora_schema::SchemaError;
use thiserror::Error;

/// Errors from storage and lifecycle operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The requested record does not exist.
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    /// The operation is not valid in the record's current state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The actor is not allowed to perform the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Input failed the field allow-list, the field schema, or a required value.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A SQL query failed or returned unusable data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    pub(crate) fn species_not_found(id: &str) -> Self {
        Self::NotFound {
            entity_type: "species".into(),
            id: id.to_string(),
        }
    }
}

impl From<CoreError> for DatabaseError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::NotFound { entity_type, id } => Self::NotFound { entity_type, id },
            e @ CoreError::InvalidTransition { .. } => Self::InvalidState(e.to_string()),
            CoreError::UnknownField(field) => Self::Validation(format!("unknown field: {field}")),
            CoreError::Validation(msg) => Self::Validation(msg),
            CoreError::Other(e) => Self::Other(e),
        }
    }
}

impl From<SchemaError> for DatabaseError {
    fn from(e: SchemaError) -> Self {
        match e {
            SchemaError::ValidationFailed { errors } => Self::Validation(errors.join("; ")),
            other => Self::Other(other.into()),
        }
    }
}
