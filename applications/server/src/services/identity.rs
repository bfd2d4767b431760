/// Identity service - business rules between the transports and the store
use crate::services::TokenService;
use async_trait::async_trait;
use identity_core::{
    IdentityController, IdentityError, NewUser, Result, UpdateUser, User, UserId, UserRepository,
};
use std::sync::Arc;
use tracing::{debug, info};

const NAME_REQUIRED: &str = "name is a vital field";

#[derive(Clone)]
pub struct IdentityService {
    repo: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
}

impl IdentityService {
    pub fn new(repo: Arc<dyn UserRepository>, tokens: Arc<TokenService>) -> Self {
        Self { repo, tokens }
    }
}

fn ensure_named(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(IdentityError::invalid(NAME_REQUIRED));
    }
    Ok(())
}

#[async_trait]
impl IdentityController for IdentityService {
    async fn create(&self, input: NewUser) -> Result<User> {
        ensure_named(&input.name)?;

        let user = User::from_new(UserId::generate(), input);
        self.repo.create(&user).await?;

        info!(user_id = %user.id, login = %user.login, "User created");
        // Hand back what the store persisted, sealed password included
        self.repo.get(&user.id).await
    }

    async fn get(&self, id: &UserId) -> Result<User> {
        self.repo.get(id).await
    }

    async fn update(&self, id: &UserId, changes: UpdateUser) -> Result<User> {
        ensure_named(&changes.name)?;

        // Unknown ids stop here; the store is never asked to update them
        self.repo.get(id).await?;

        let user = User::with_update(id.clone(), changes);
        self.repo.update(&user).await?;

        debug!(user_id = %id, "User updated");
        self.repo.get(id).await
    }

    async fn delete(&self, id: &UserId) -> Result<()> {
        self.repo.get(id).await?;
        self.repo.delete(id).await?;

        info!(user_id = %id, "User deleted");
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<User>> {
        self.repo.list_all().await
    }

    async fn authorize(&self, login: &str, password: &str) -> Result<String> {
        let user = self
            .repo
            .check_credentials(login, password)
            .await
            .map_err(|e| {
                if e.is_credential_mismatch() {
                    IdentityError::AuthFailed(format!("failed to authorize user: {e}"))
                } else {
                    e
                }
            })?;

        let token = self
            .tokens
            .issue(&user.id)
            .map_err(|e| IdentityError::internal(format!("failed to sign token: {e}")))?;

        debug!(user_id = %user.id, "Token issued");
        Ok(token)
    }

    async fn verify(&self, login: &str, password: &str) -> Result<bool> {
        match self.repo.check_credentials(login, password).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_credential_mismatch() => {
                debug!(login = %login, "Credential check did not match");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}
