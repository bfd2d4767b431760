//! Per-chat authorization state kept by a chat front end.

use crate::client::CredentialVerifier;
use crate::error::{ClientError, Result};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Chat (conversation) identifier as assigned by the messaging platform
pub type ChatId = i64;

/// Split `"<login> <password>"` into its two parts.
///
/// Exactly one space-separated pair is accepted; anything else is malformed.
pub fn split_credentials(text: &str) -> Result<(&str, &str)> {
    let mut parts = text.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(login), Some(password), None) if !login.is_empty() && !password.is_empty() => {
            Ok((login, password))
        }
        _ => Err(ClientError::MalformedCredentials),
    }
}

/// Authorization outcome per chat, owned by the front end rather than kept
/// in process-wide state.
///
/// Each authentication attempt writes exactly one entry; every later message
/// reads it.
pub struct ChatSessions<V> {
    verifier: V,
    authorized: RwLock<HashMap<ChatId, bool>>,
}

impl<V: CredentialVerifier> ChatSessions<V> {
    pub fn new(verifier: V) -> Self {
        Self {
            verifier,
            authorized: RwLock::new(HashMap::new()),
        }
    }

    /// Check `text` as credentials for `chat_id` and remember the outcome.
    ///
    /// Malformed text and failed RPC calls both record the chat as not
    /// authorized.
    pub async fn authenticate(&self, chat_id: ChatId, text: &str) -> bool {
        let outcome = match split_credentials(text) {
            Ok((login, password)) => match self.verifier.verify(login, password).await {
                Ok(success) => success,
                Err(e) => {
                    warn!(chat_id, "Credential check failed: {}", e);
                    false
                }
            },
            Err(e) => {
                info!(chat_id, "Rejected authentication attempt: {}", e);
                false
            }
        };

        self.authorized.write().await.insert(chat_id, outcome);
        outcome
    }

    /// Whether the last authentication attempt for `chat_id` succeeded
    pub async fn is_authorized(&self, chat_id: ChatId) -> bool {
        self.authorized
            .read()
            .await
            .get(&chat_id)
            .copied()
            .unwrap_or(false)
    }

    /// Drop the stored outcome for `chat_id`
    pub async fn forget(&self, chat_id: ChatId) {
        self.authorized.write().await.remove(&chat_id);
    }
}
