/// Storage-specific errors
use identity_core::IdentityError;
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violated
    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    /// Record rejected before or by a CHECK constraint
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Stored credential did not accept the candidate password
    #[error("Credential mismatch for login: {0}")]
    CredentialMismatch(String),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Classify a failed write, surfacing constraint violations as domain errors
    pub(crate) fn from_write(err: sqlx::Error, context: &str) -> Self {
        match err.as_database_error() {
            Some(db) if db.is_unique_violation() => Self::Duplicate(context.to_string()),
            Some(db) if db.is_check_violation() => Self::InvalidRecord(db.message().to_string()),
            _ => Self::Database(err),
        }
    }
}

impl From<StorageError> for IdentityError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { entity, id } => IdentityError::NotFound { entity, id },
            StorageError::Duplicate(what) => IdentityError::conflict(what),
            StorageError::InvalidRecord(msg) => IdentityError::invalid(msg),
            StorageError::CredentialMismatch(login) => {
                IdentityError::unauthorized(format!("password does not match login {login}"))
            }
            other => IdentityError::internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_errors_map_to_domain_taxonomy() {
        assert!(matches!(
            IdentityError::from(StorageError::not_found("User", "1")),
            IdentityError::NotFound { .. }
        ));
        assert!(matches!(
            IdentityError::from(StorageError::Duplicate("login test".to_string())),
            IdentityError::Conflict(_)
        ));
        assert!(matches!(
            IdentityError::from(StorageError::CredentialMismatch("test".to_string())),
            IdentityError::Unauthorized(_)
        ));
        assert!(matches!(
            IdentityError::from(StorageError::Database(sqlx::Error::PoolTimedOut)),
            IdentityError::Internal(_)
        ));
    }
}
