//! # Postgate server
//!
//! Wires users-core and posts-core into one axum application. Both route sets
//! share a single [`postgate_auth_core::Authenticator`], so a token issued by
//! `/api/auth/login` is accepted by every protected post route.

pub mod logging;

use axum::{http::StatusCode, middleware, response::IntoResponse, routing::get, Json, Router};
use postgate_posts_core::PostsService;
use postgate_users_core::api::security_headers::security_headers_middleware;
use postgate_users_core::{UsersConfig, UsersService};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// The assembled application and the services behind it.
pub struct App {
    pub router: Router,
    pub users: UsersService,
    pub posts: PostsService,
}

/// Build every service from `config` and mount their routes.
///
/// Fails when the token configuration is unusable, e.g. no signing secret.
pub fn build_app(config: &UsersConfig) -> postgate_users_core::Result<App> {
    let users = postgate_users_core::init(config)?;
    let posts = postgate_posts_core::init(users.authenticator.clone());
    let router = router(&users, &posts);
    Ok(App { router, users, posts })
}

pub fn router(users: &UsersService, posts: &PostsService) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .merge(postgate_users_core::api::create_router(users.api_state()))
        .merge(postgate_posts_core::api::create_router(posts.api_state()))
        .fallback(not_found)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn health() -> impl IntoResponse {
    Json(json!({ "success": true, "message": "Server is running" }))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "message": "Route not found" })),
    )
}
