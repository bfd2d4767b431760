/// User API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{StatusCode, Uri},
    Json,
};
use identity_core::{NewUser, UpdateUser, User, UserId};
use serde::{Deserialize, Serialize};

/// User fields accepted on create and update.
///
/// Missing fields default to empty so that validation, not the JSON parser,
/// reports them. A client-supplied `id` is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserPayload {
    pub name: String,
    pub login: String,
    pub password: String,
    pub description: Option<String>,
}

impl From<UserPayload> for NewUser {
    fn from(p: UserPayload) -> Self {
        NewUser {
            name: p.name,
            login: p.login,
            password: p.password,
            description: p.description,
        }
    }
}

impl From<UserPayload> for UpdateUser {
    fn from(p: UserPayload) -> Self {
        UpdateUser {
            name: p.name,
            login: p.login,
            password: p.password,
            description: p.description,
        }
    }
}

/// User as exposed over HTTP; the password never leaves the server
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub login: String,
    pub description: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id.to_string(),
            name: user.name,
            login: user.login,
            description: user.description,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AuthQuery {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
}

fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| ServerError::BadRequest(e.body_text()))
}

/// POST /user/create
pub async fn create_user(
    State(app_state): State<AppState>,
    payload: std::result::Result<Json<UserPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let payload = json_body(payload)?;
    let user = app_state.identity.create(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Credentials come from the query string when one is present, otherwise
/// from a JSON body
fn auth_credentials(uri: &Uri, body: &Bytes) -> Result<AuthQuery> {
    match uri.query() {
        Some(q) if !q.is_empty() => Query::<AuthQuery>::try_from_uri(uri)
            .map(|Query(query)| query)
            .map_err(|e| ServerError::BadRequest(e.body_text())),
        _ => serde_json::from_slice(body)
            .map_err(|e| ServerError::BadRequest(format!("Invalid credentials: {e}"))),
    }
}

/// GET /user/auth?login=..&password=.. (or `{"login", "password"}` body)
pub async fn authorize(
    State(app_state): State<AppState>,
    uri: Uri,
    body: Bytes,
) -> Result<Json<TokenResponse>> {
    let query = auth_credentials(&uri, &body)?;
    let token = app_state
        .identity
        .authorize(&query.login, &query.password)
        .await?;

    Ok(Json(TokenResponse {
        token,
        token_type: "Bearer".to_string(),
    }))
}

/// GET /user/:id
pub async fn get_user(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>> {
    let user = app_state.identity.get(&UserId::new(id)).await?;
    Ok(Json(user.into()))
}

/// PUT /user/:id
pub async fn update_user(
    State(app_state): State<AppState>,
    caller: AuthenticatedUser,
    Path(id): Path<String>,
    payload: std::result::Result<Json<UserPayload>, JsonRejection>,
) -> Result<Json<UserResponse>> {
    let payload = json_body(payload)?;
    let id = UserId::new(id);

    tracing::debug!(caller = %caller.user_id(), target = %id, "Updating user");
    let user = app_state.identity.update(&id, payload.into()).await?;

    Ok(Json(user.into()))
}

/// DELETE /user/:id
pub async fn delete_user(
    State(app_state): State<AppState>,
    caller: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = UserId::new(id);

    tracing::debug!(caller = %caller.user_id(), target = %id, "Deleting user");
    app_state.identity.delete(&id).await?;

    Ok(StatusCode::OK)
}

/// GET /user
pub async fn list_users(State(app_state): State<AppState>) -> Result<Json<Vec<UserResponse>>> {
    let users = app_state.identity.list_all().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}
