//! Common test utilities and fixtures
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use identity_core::{IdentityController, UserRepository};
use identity_server::{create_router, AppState, IdentityService, TokenService};
use identity_storage::{PlaintextScheme, SqliteUserStore};
use std::sync::Arc;
use tempfile::TempDir;

pub const TEST_SECRET: &str = "test-secret-key";

/// Fully wired server over a throwaway SQLite file
pub struct TestApp {
    pub router: Router,
    pub identity: Arc<dyn IdentityController>,
    pub tokens: Arc<TokenService>,
    pub store: Arc<SqliteUserStore>,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());

        let pool = identity_storage::create_pool(&db_url, 5).await.unwrap();
        identity_storage::run_migrations(&pool).await.unwrap();

        let store = Arc::new(SqliteUserStore::new(pool, Arc::new(PlaintextScheme)));
        let tokens = Arc::new(TokenService::new(TEST_SECRET, 60));
        let repo: Arc<dyn UserRepository> = store.clone();
        let identity: Arc<dyn IdentityController> =
            Arc::new(IdentityService::new(repo, Arc::clone(&tokens)));

        let router = create_router(AppState::new(Arc::clone(&identity), Arc::clone(&tokens)));

        Self {
            router,
            identity,
            tokens,
            store,
            _temp_dir: temp_dir,
        }
    }
}

/// Build a router around any controller (e.g. a mock)
pub fn router_with(identity: Arc<dyn IdentityController>) -> Router {
    create_router(AppState::new(
        identity,
        Arc::new(TokenService::new(TEST_SECRET, 60)),
    ))
}

pub fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

pub fn authed_request(method: &str, uri: &str, authorization: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, authorization)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Test user credentials
pub mod fixtures {
    pub const TEST_NAME: &str = "test";
    pub const TEST_LOGIN: &str = "test";
    pub const TEST_PASSWORD: &str = "test";
}
