//! Database-specific error types and conversions.

use orgsync_core::error::OrgsyncError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Schema migration failed: {0}")]
    Schema(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for OrgsyncError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => OrgsyncError::NotFound { entity, id },
            other => OrgsyncError::Database(other.to_string()),
        }
    }
}
