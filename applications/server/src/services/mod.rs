/// Server services
pub mod auth;
pub mod identity;

pub use auth::TokenService;
pub use identity::IdentityService;
