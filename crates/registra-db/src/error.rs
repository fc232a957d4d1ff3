//! Database-specific error types and conversions.

use registra_core::error::RegistraError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Query rejected: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Stored value could not be decoded: {0}")]
    Decode(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Record already exists: {entity}")]
    Conflict { entity: String },
}

impl From<DbError> for RegistraError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => RegistraError::NotFound { entity, id },
            DbError::Conflict { entity } => RegistraError::AlreadyExists { entity },
            other => RegistraError::Database(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::Decode(err.to_string())
    }
}

/// Classify a failed write. A unique-index violation means a concurrent
/// writer took the key between the existence check and the write.
pub(crate) fn write_error(entity: &str, err: impl std::fmt::Display) -> DbError {
    let message = err.to_string();
    if is_unique_violation(&message) {
        DbError::Conflict {
            entity: entity.to_string(),
        }
    } else {
        DbError::Query(message)
    }
}

fn is_unique_violation(message: &str) -> bool {
    message.contains("already contains")
}

/// Parse a UUID stored as a string.
pub(crate) fn parse_uuid(value: &str, what: &str) -> Result<uuid::Uuid, DbError> {
    uuid::Uuid::parse_str(value).map_err(|e| DbError::Decode(format!("invalid {what} UUID: {e}")))
}
