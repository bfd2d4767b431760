/// HTTP router assembly
use crate::{api, middleware, state::AppState};
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the HTTP surface: public account creation and token issuance,
/// everything else behind the bearer-token gate.
pub fn create_router(app_state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(api::health::health))
        .route("/user/create", post(api::users::create_user))
        .route("/user/auth", get(api::users::authorize));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/user", get(api::users::list_users))
        .route(
            "/user/:id",
            get(api::users::get_user)
                .put(api::users::update_user)
                .delete(api::users::delete_user),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            Arc::clone(&app_state.tokens),
            middleware::auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
