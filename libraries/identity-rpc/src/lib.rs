//! Identity RPC contract
//!
//! Generated protobuf types plus the tonic client and server for the
//! `identity.v1.UserAuth` service. The service exposes a single `Verify`
//! procedure: `{login, password}` in, `{success}` out.

#[allow(clippy::all, clippy::pedantic)]
pub mod proto {
    tonic::include_proto!("identity.v1");
}

pub use proto::user_auth_client::UserAuthClient;
pub use proto::user_auth_server::{UserAuth, UserAuthServer};
pub use proto::{VerifyRequest, VerifyResponse};

impl VerifyRequest {
    /// Build a request from borrowed credentials
    pub fn with_credentials(login: &str, password: &str) -> Self {
        Self {
            login: login.to_string(),
            password: password.to_string(),
        }
    }
}
