/// Shared application state
use crate::services::TokenService;
use identity_core::IdentityController;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityController>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(identity: Arc<dyn IdentityController>, tokens: Arc<TokenService>) -> Self {
        Self { identity, tokens }
    }
}
