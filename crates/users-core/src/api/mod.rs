//! REST API for users-core

pub mod handlers;
pub mod security_headers;

use std::sync::Arc;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use postgate_auth_core::Authenticator;

use crate::AuthenticationService;

/// Shared state for the users routes
#[derive(Clone)]
pub struct ApiState {
    pub auth_service: Arc<AuthenticationService>,
    pub authenticator: Authenticator,
}

impl FromRef<ApiState> for Authenticator {
    fn from_ref(state: &ApiState) -> Self {
        state.authenticator.clone()
    }
}

/// Create the REST API router
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/me", get(handlers::me))
        .route("/api/users", get(handlers::list_users))
        .route("/api/users/:id", put(handlers::update_user))
        .route("/api/users/:id/role", patch(handlers::set_role))
        .route("/api/users/:id/status", patch(handlers::set_status))
        .layer(middleware::from_fn(security_headers::security_headers_middleware))
        .with_state(state)
}
