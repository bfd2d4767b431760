//! Identity Server Library
//!
//! User records, token issuance and credential checks, served over HTTP and RPC.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod rpc;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::{PasswordScheme, ServerConfig};
pub use error::{Result, ServerError};
pub use routes::create_router;
pub use rpc::UserAuthRpc;
pub use services::{IdentityService, TokenService};
pub use state::AppState;
