/// Core error types for the identity service
use thiserror::Error;

/// Result type alias using `IdentityError`
pub type Result<T> = std::result::Result<T, IdentityError>;

/// Classified failure of an identity operation.
///
/// Transport layers translate these into their own status vocabulary; nothing
/// below the front door knows about HTTP or gRPC codes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// Malformed or missing required input, caught before storage
    #[error("Invalid input: {0}")]
    Invalid(String),

    /// Uniqueness violation
    #[error("Conflict: {0}")]
    Conflict(String),

    /// No record matches the given key
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Credential check failed while issuing a token
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Credential mismatch or token verification failure
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Storage or transport failure not classified above
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IdentityError {
    /// Create an invalid input error
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// True for failures that mean "these credentials do not match a record"
    pub fn is_credential_mismatch(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Unauthorized(_))
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for IdentityError {
    fn from(err: sqlx::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = IdentityError::not_found("User", "42");
        assert_eq!(err.to_string(), "User not found: 42");
    }

    #[test]
    fn test_credential_mismatch_classification() {
        assert!(IdentityError::not_found("User", "bob").is_credential_mismatch());
        assert!(IdentityError::unauthorized("bad password").is_credential_mismatch());
        assert!(!IdentityError::internal("disk full").is_credential_mismatch());
        assert!(!IdentityError::invalid("name is a vital field").is_credential_mismatch());
    }
}
