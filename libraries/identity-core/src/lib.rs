//! Identity Core
//!
//! Domain types, capability traits, and error handling shared by the identity
//! service crates.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `NewUser`, `UpdateUser`, `UserId`
//! - **Capability Traits**: `UserRepository` (record store), `IdentityController`
//!   (business rules), `CredentialScheme` (password sealing/verification)
//! - **Error Handling**: Unified `IdentityError` and `Result` types
//!
//! Transport crates depend on the traits, never on a concrete store, so the
//! controller and both front doors can be exercised against substitutes.
//!
//! # Example
//!
//! ```rust
//! use identity_core::types::{NewUser, User, UserId};
//!
//! let input = NewUser {
//!     name: "Alice".to_string(),
//!     login: "alice".to_string(),
//!     password: "secret".to_string(),
//!     description: None,
//! };
//!
//! let user = User::from_new(UserId::generate(), input);
//! assert_eq!(user.name, "Alice");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{IdentityError, Result};
pub use traits::{CredentialScheme, IdentityController, UserRepository};
pub use types::{NewUser, UpdateUser, User, UserId};

#[cfg(feature = "mocks")]
pub use traits::{MockIdentityController, MockUserRepository};
