/// User domain types
use super::UserId;
use serde::{Deserialize, Serialize};

/// Persisted user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned identifier, immutable once set
    pub id: UserId,

    /// Display name, never empty
    pub name: String,

    /// Credential identifier, unique across records
    pub login: String,

    /// Credential secret in the format produced by the active `CredentialScheme`
    pub password: String,

    /// Optional free text
    pub description: Option<String>,
}

/// Input for creating a user (the id is assigned by the controller)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub login: String,
    pub password: String,
    pub description: Option<String>,
}

/// Replacement values for every mutable field of a user
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    pub name: String,
    pub login: String,
    pub password: String,
    pub description: Option<String>,
}

impl User {
    /// Build a record from creation input and a freshly assigned id
    pub fn from_new(id: UserId, input: NewUser) -> Self {
        Self {
            id,
            name: input.name,
            login: input.login,
            password: input.password,
            description: input.description,
        }
    }

    /// Apply an update, keeping the id
    pub fn with_update(id: UserId, changes: UpdateUser) -> Self {
        Self {
            id,
            name: changes.name,
            login: changes.login,
            password: changes.password,
            description: changes.description,
        }
    }
}
