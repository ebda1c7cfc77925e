//! Error types for the orgsync system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrgsyncError {
    #[error("No root organization is defined")]
    NoRootOrganization,

    #[error("Multiple root organizations found")]
    MultipleRootOrganizations,

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type OrgsyncResult<T> = Result<T, OrgsyncError>;
