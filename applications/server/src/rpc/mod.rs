//! RPC front door: `identity.v1.UserAuth`

use identity_core::{IdentityController, IdentityError};
use identity_rpc::{UserAuth, UserAuthServer, VerifyRequest, VerifyResponse};
use std::sync::Arc;
use tonic::{Code, Request, Response, Status};

/// Translate a classified failure into the RPC status vocabulary
pub fn into_status(err: &IdentityError) -> Status {
    let code = match err {
        IdentityError::Invalid(_) | IdentityError::AuthFailed(_) => Code::InvalidArgument,
        IdentityError::Unauthorized(_) => Code::Unauthenticated,
        IdentityError::NotFound { .. } => Code::NotFound,
        IdentityError::Conflict(_) => Code::AlreadyExists,
        IdentityError::Internal(_) => Code::Internal,
    };

    // Internal details stay in the server log
    let message = match err {
        IdentityError::Internal(msg) => {
            tracing::error!("Internal error: {}", msg);
            "internal error".to_string()
        }
        other => other.to_string(),
    };

    Status::new(code, message)
}

/// Credential check exposed to peer processes
#[derive(Clone)]
pub struct UserAuthRpc {
    controller: Arc<dyn IdentityController>,
}

impl UserAuthRpc {
    pub fn new(controller: Arc<dyn IdentityController>) -> Self {
        Self { controller }
    }

    /// Wrap into the generated tonic service
    pub fn into_service(self) -> UserAuthServer<Self> {
        UserAuthServer::new(self)
    }
}

#[tonic::async_trait]
impl UserAuth for UserAuthRpc {
    async fn verify(
        &self,
        request: Request<VerifyRequest>,
    ) -> Result<Response<VerifyResponse>, Status> {
        let VerifyRequest { login, password } = request.into_inner();

        let success = self
            .controller
            .verify(&login, &password)
            .await
            .map_err(|e| into_status(&e))?;

        tracing::debug!(login = %login, success, "RPC credential check");
        Ok(Response::new(VerifyResponse { success }))
    }
}
