//! Identity Client
//!
//! Peer-side access to the identity service's RPC credential check, plus the
//! per-chat authorization state a chat front end keeps between messages.
//!
//! # Example
//!
//! ```ignore
//! use identity_client::{ChatSessions, VerifyClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = VerifyClient::connect("http://127.0.0.1:8085").await?;
//!     let sessions = ChatSessions::new(client);
//!
//!     // First message of a chat carries "<login> <password>"
//!     if sessions.authenticate(42, "alice s3cret").await {
//!         println!("chat 42 may continue");
//!     }
//!
//!     assert!(sessions.is_authorized(42).await);
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod sessions;

pub use client::{CredentialVerifier, VerifyClient};
pub use error::{ClientError, Result};
pub use sessions::{split_credentials, ChatId, ChatSessions};
