//! Identity Storage
//!
//! `SQLite` record store for the identity service.
//!
//! # Architecture
//!
//! - **Single entity**: one `users` table keyed by `id` with a UNIQUE `login`
//! - **Constraint-backed invariants**: duplicate logins are rejected by the
//!   database, never by a check-then-insert in application code
//! - **Pluggable credentials**: passwords pass through a `CredentialScheme`
//!   before they are written or compared
//!
//! # Example
//!
//! ```rust,no_run
//! use identity_core::UserRepository;
//! use identity_storage::{create_pool, run_migrations, BcryptScheme, SqliteUserStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://identity.db", 5).await?;
//! run_migrations(&pool).await?;
//!
//! let store = SqliteUserStore::new(pool, Arc::new(BcryptScheme::default()));
//! let users = store.list_all().await?;
//! # Ok(())
//! # }
//! ```

mod credentials;
mod error;

pub mod users;

pub use credentials::{BcryptScheme, PlaintextScheme};
pub use error::StorageError;
pub use users::SqliteUserStore;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://identity.db>`)
/// * `max_connections` - Upper bound on pooled connections
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(url = %database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal) // readers don't block the single writer
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    tracing::debug!("SQLite pool ready");

    Ok(pool)
}
