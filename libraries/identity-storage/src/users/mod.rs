//! User record queries and the `UserRepository` implementation

use crate::error::{Result, StorageError};
use async_trait::async_trait;
use identity_core::{CredentialScheme, IdentityError, User, UserId, UserRepository};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;
use tokio::sync::OnceCell;

const USER_COLUMNS: &str = "id, name, login, password, description";

fn map_row(row: &SqliteRow) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        login: row.try_get("login")?,
        password: row.try_get("password")?,
        description: row.try_get("description")?,
    })
}

fn ensure_persistable(user: &User) -> Result<()> {
    if user.id.is_empty() {
        return Err(StorageError::InvalidRecord("id is required".to_string()));
    }
    if user.name.trim().is_empty() {
        return Err(StorageError::InvalidRecord("name is a vital field".to_string()));
    }
    Ok(())
}

/// Insert a new user row
///
/// The UNIQUE constraint on `login` (and the primary key on `id`) rejects
/// duplicates inside the INSERT itself, so two concurrent creates with the
/// same login cannot both succeed.
pub async fn insert(pool: &SqlitePool, user: &User) -> Result<()> {
    ensure_persistable(user)?;

    sqlx::query(
        "INSERT INTO users (id, name, login, password, description) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&user.id)
    .bind(&user.name)
    .bind(&user.login)
    .bind(&user.password)
    .bind(&user.description)
    .execute(pool)
    .await
    .map_err(|e| {
        StorageError::from_write(
            e,
            &format!("user {} or login {} already exists", user.id, user.login),
        )
    })?;

    Ok(())
}

/// Get a user by id
pub async fn find_by_id(pool: &SqlitePool, id: &UserId) -> Result<Option<User>> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(map_row).transpose()
}

/// Get a user by login
pub async fn find_by_login(pool: &SqlitePool, login: &str) -> Result<Option<User>> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE login = ?"))
        .bind(login)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(map_row).transpose()
}

/// Replace every mutable column of an existing row
pub async fn replace(pool: &SqlitePool, user: &User) -> Result<()> {
    ensure_persistable(user)?;

    let result = sqlx::query(
        "UPDATE users SET name = ?, login = ?, password = ?, description = ? WHERE id = ?",
    )
    .bind(&user.name)
    .bind(&user.login)
    .bind(&user.password)
    .bind(&user.description)
    .bind(&user.id)
    .execute(pool)
    .await
    .map_err(|e| StorageError::from_write(e, &format!("login {} already exists", user.login)))?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("User", user.id.as_str()));
    }

    Ok(())
}

/// Delete a user row
pub async fn remove(pool: &SqlitePool, id: &UserId) -> Result<()> {
    if id.is_empty() {
        return Err(StorageError::not_found("User", id.as_str()));
    }

    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("User", id.as_str()));
    }

    Ok(())
}

/// Get all users
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY name, id"))
        .fetch_all(pool)
        .await?;

    rows.iter().map(map_row).collect()
}

/// `SQLite`-backed record store
///
/// Passwords are sealed with the configured `CredentialScheme` on the way in
/// and verified with it on credential checks. Scheme calls run on the blocking
/// pool since hashing is CPU bound.
///
/// Unknown logins are checked against a sealed decoy so both outcomes of a
/// credential check cost one scheme verification.
#[derive(Clone)]
pub struct SqliteUserStore {
    pool: SqlitePool,
    scheme: Arc<dyn CredentialScheme>,
    decoy: Arc<OnceCell<String>>,
}

const DECOY_PASSWORD: &str = "identity-storage-decoy";

impl SqliteUserStore {
    pub fn new(pool: SqlitePool, scheme: Arc<dyn CredentialScheme>) -> Self {
        Self {
            pool,
            scheme,
            decoy: Arc::new(OnceCell::new()),
        }
    }

    /// Get a reference to the underlying pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Name of the active credential scheme
    pub fn scheme_name(&self) -> &'static str {
        self.scheme.name()
    }

    async fn seal(&self, password: &str) -> identity_core::Result<String> {
        let scheme = Arc::clone(&self.scheme);
        let password = password.to_string();
        tokio::task::spawn_blocking(move || scheme.seal(&password))
            .await
            .map_err(|e| IdentityError::internal(format!("credential task failed: {e}")))?
    }

    async fn matches(&self, password: &str, stored: &str) -> identity_core::Result<bool> {
        let scheme = Arc::clone(&self.scheme);
        let password = password.to_string();
        let stored = stored.to_string();
        tokio::task::spawn_blocking(move || scheme.verify(&password, &stored))
            .await
            .map_err(|e| IdentityError::internal(format!("credential task failed: {e}")))?
    }
}

#[async_trait]
impl UserRepository for SqliteUserStore {
    async fn create(&self, user: &User) -> identity_core::Result<()> {
        ensure_persistable(user)?;

        let sealed = User {
            password: self.seal(&user.password).await?,
            ..user.clone()
        };
        insert(&self.pool, &sealed).await?;

        tracing::debug!(user_id = %user.id, "User row inserted");
        Ok(())
    }

    async fn get(&self, id: &UserId) -> identity_core::Result<User> {
        find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| IdentityError::not_found("User", id.as_str()))
    }

    async fn update(&self, user: &User) -> identity_core::Result<()> {
        ensure_persistable(user)?;

        let sealed = User {
            password: self.seal(&user.password).await?,
            ..user.clone()
        };
        replace(&self.pool, &sealed).await?;

        tracing::debug!(user_id = %user.id, "User row replaced");
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> identity_core::Result<()> {
        remove(&self.pool, id).await?;

        tracing::debug!(user_id = %id, "User row deleted");
        Ok(())
    }

    async fn list_all(&self) -> identity_core::Result<Vec<User>> {
        Ok(get_all(&self.pool).await?)
    }

    async fn check_credentials(&self, login: &str, password: &str) -> identity_core::Result<User> {
        let Some(user) = find_by_login(&self.pool, login).await? else {
            let decoy = self
                .decoy
                .get_or_try_init(|| self.seal(DECOY_PASSWORD))
                .await?;
            self.matches(password, decoy).await?;
            return Err(IdentityError::not_found("User", login));
        };

        if !self.matches(password, &user.password).await? {
            return Err(StorageError::CredentialMismatch(login.to_string()).into());
        }

        Ok(user)
    }
}
