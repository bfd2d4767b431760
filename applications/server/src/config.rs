/// Server configuration
use crate::error::{Result, ServerError};
use identity_core::CredentialScheme;
use identity_storage::{BcryptScheme, PlaintextScheme};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_rpc")]
    pub rpc: RpcSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_auth")]
    pub auth: AuthSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RpcSettings {
    #[serde(default = "default_rpc_host")]
    pub host: String,

    #[serde(default = "default_rpc_port")]
    pub port: u16,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub jwt_secret: String,

    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: u64,

    #[serde(default)]
    pub password_scheme: PasswordScheme,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

/// How passwords are persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordScheme {
    #[default]
    Bcrypt,
    /// Stored as given; only for databases carrying legacy plaintext rows
    Plaintext,
}

impl AuthSettings {
    /// Build the credential scheme the store should use
    pub fn credential_scheme(&self) -> Arc<dyn CredentialScheme> {
        match self.password_scheme {
            PasswordScheme::Bcrypt => Arc::new(BcryptScheme::new(self.bcrypt_cost)),
            PasswordScheme::Plaintext => Arc::new(PlaintextScheme),
        }
    }
}

impl ServerConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `config.toml` in the working
    /// directory is used when present. Environment variables prefixed with
    /// `IDENTITY_` override file values, `__` separating section and key
    /// (e.g. `IDENTITY_AUTH__JWT_SECRET`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let config_path = PathBuf::from("config.toml");
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("IDENTITY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(ServerError::Config(
                "JWT secret is required (set IDENTITY_AUTH__JWT_SECRET)".to_string(),
            ));
        }

        if self.auth.token_ttl_minutes == 0 {
            return Err(ServerError::Config(
                "auth.token_ttl_minutes must be positive".to_string(),
            ));
        }

        if self.auth.password_scheme == PasswordScheme::Bcrypt
            && !(4..=31).contains(&self.auth.bcrypt_cost)
        {
            return Err(ServerError::Config(format!(
                "auth.bcrypt_cost must be between 4 and 31, got {}",
                self.auth.bcrypt_cost
            )));
        }

        if self.storage.max_connections == 0 {
            return Err(ServerError::Config(
                "storage.max_connections must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_rpc() -> RpcSettings {
    RpcSettings {
        host: default_rpc_host(),
        port: default_rpc_port(),
        enabled: default_enabled(),
    }
}

fn default_rpc_host() -> String {
    "127.0.0.1".to_string()
}

fn default_rpc_port() -> u16 {
    8085
}

fn default_enabled() -> bool {
    true
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
        max_connections: default_max_connections(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/identity.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_auth() -> AuthSettings {
    AuthSettings {
        jwt_secret: String::new(),
        token_ttl_minutes: default_token_ttl_minutes(),
        password_scheme: PasswordScheme::default(),
        bcrypt_cost: default_bcrypt_cost(),
    }
}

fn default_token_ttl_minutes() -> u64 {
    60
}

fn default_bcrypt_cost() -> u32 {
    12
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            rpc: default_rpc(),
            storage: default_storage(),
            auth: default_auth(),
        }
    }
}
