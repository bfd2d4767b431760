//! RPC client for the identity service credential check.

use crate::error::Result;
use async_trait::async_trait;
use identity_rpc::{UserAuthClient, VerifyRequest};
use tonic::transport::Channel;
use tracing::debug;

/// Anything able to answer "do these credentials belong to a user?"
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Returns `Ok(true)` when the credentials match a stored user
    ///
    /// # Errors
    /// Returns an error when the check itself could not be performed
    async fn verify(&self, login: &str, password: &str) -> Result<bool>;
}

/// Thin wrapper over the generated tonic client
#[derive(Debug, Clone)]
pub struct VerifyClient {
    inner: UserAuthClient<Channel>,
}

impl VerifyClient {
    /// Connect to the identity service RPC endpoint (e.g. `http://127.0.0.1:8085`)
    pub async fn connect(endpoint: impl Into<String>) -> Result<Self> {
        let endpoint = endpoint.into();
        debug!(endpoint = %endpoint, "Connecting to identity service");

        let inner = UserAuthClient::connect(endpoint).await?;
        Ok(Self { inner })
    }

    /// Wrap an already-established channel
    pub fn from_channel(channel: Channel) -> Self {
        Self {
            inner: UserAuthClient::new(channel),
        }
    }
}

#[async_trait]
impl CredentialVerifier for VerifyClient {
    async fn verify(&self, login: &str, password: &str) -> Result<bool> {
        // Generated clients are cheap to clone and need `&mut self`
        let mut client = self.inner.clone();
        let response = client
            .verify(VerifyRequest::with_credentials(login, password))
            .await?;

        let success = response.into_inner().success;
        debug!(login = %login, success, "Credential check answered");
        Ok(success)
    }
}
