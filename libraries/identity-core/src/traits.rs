/// Capability traits for the identity service
use crate::error::Result;
use crate::types::{NewUser, UpdateUser, User, UserId};
use async_trait::async_trait;

/// Durable storage of user records
///
/// Implementations own the uniqueness and existence invariants: a duplicate
/// `login` must be rejected atomically by the backing store, and update/delete
/// of an unknown id must fail with `NotFound` without mutating anything.
#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new record
    ///
    /// # Errors
    /// `Invalid` if id or name is empty, `Conflict` if the login is taken
    async fn create(&self, user: &User) -> Result<()>;

    /// Fetch a record by id
    ///
    /// # Errors
    /// `NotFound` if no record has this id
    async fn get(&self, id: &UserId) -> Result<User>;

    /// Replace every mutable field of an existing record
    ///
    /// # Errors
    /// `NotFound` if the id does not exist
    async fn update(&self, user: &User) -> Result<()>;

    /// Hard-delete a record
    ///
    /// # Errors
    /// `NotFound` if the id is empty or does not exist
    async fn delete(&self, id: &UserId) -> Result<()>;

    /// Every stored record
    async fn list_all(&self) -> Result<Vec<User>>;

    /// Return the record whose login and password both match
    ///
    /// # Errors
    /// `NotFound` for an unknown login, `Unauthorized` for a wrong password
    async fn check_credentials(&self, login: &str, password: &str) -> Result<User>;
}

/// Business rules sitting between the transports and the store
#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait IdentityController: Send + Sync {
    /// Validate input, assign a fresh id and persist
    async fn create(&self, input: NewUser) -> Result<User>;

    /// Fetch a record by id
    async fn get(&self, id: &UserId) -> Result<User>;

    /// Replace the mutable fields of an existing record
    async fn update(&self, id: &UserId, changes: UpdateUser) -> Result<User>;

    /// Delete an existing record
    async fn delete(&self, id: &UserId) -> Result<()>;

    /// Every stored record
    async fn list_all(&self) -> Result<Vec<User>>;

    /// Check credentials and mint a signed bearer token
    async fn authorize(&self, login: &str, password: &str) -> Result<String>;

    /// Check credentials without minting a token
    async fn verify(&self, login: &str, password: &str) -> Result<bool>;
}

/// Turns a plaintext password into its persisted form and checks candidates
/// against that form.
pub trait CredentialScheme: Send + Sync {
    /// Short name used in configuration and logs
    fn name(&self) -> &'static str;

    /// Produce the value to persist for `password`
    ///
    /// # Errors
    /// Returns an error if the scheme cannot process the input
    fn seal(&self, password: &str) -> Result<String>;

    /// Check `password` against a previously sealed value
    ///
    /// # Errors
    /// Returns an error only for failures unrelated to a mismatch
    fn verify(&self, password: &str, stored: &str) -> Result<bool>;
}
