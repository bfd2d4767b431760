//! Error types for the identity client.

use thiserror::Error;

/// Result type alias using `ClientError`
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the identity service.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Could not reach the identity service
    #[error("Identity service unreachable: {0}")]
    Unreachable(#[from] tonic::transport::Error),

    /// The service answered with a non-OK status
    #[error("Verify call failed ({code:?}): {message}")]
    Rpc { code: tonic::Code, message: String },

    /// Chat text was not of the form `<login> <password>`
    #[error("Expected \"<login> <password>\"")]
    MalformedCredentials,
}

impl From<tonic::Status> for ClientError {
    fn from(status: tonic::Status) -> Self {
        Self::Rpc {
            code: status.code(),
            message: status.message().to_string(),
        }
    }
}
