//! Database-specific error types and conversions.

use innkeep_core::error::InnkeepError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for InnkeepError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => InnkeepError::NotFound { entity, id },
            other => InnkeepError::Database(other.to_string()),
        }
    }
}
