//! REST API for posts-core

pub mod handlers;

use std::sync::Arc;

use axum::{
    extract::FromRef,
    routing::{delete, get, post},
    Router,
};
use postgate_auth_core::Authenticator;

use crate::PostService;

#[derive(Clone)]
pub struct PostsState {
    pub service: Arc<PostService>,
    pub authenticator: Authenticator,
}

impl FromRef<PostsState> for Authenticator {
    fn from_ref(state: &PostsState) -> Self {
        state.authenticator.clone()
    }
}

pub fn create_router(state: PostsState) -> Router {
    Router::new()
        .route("/api/posts", get(handlers::list_posts).post(handlers::create_post))
        .route(
            "/api/posts/:id",
            get(handlers::get_post)
                .put(handlers::update_post)
                .delete(handlers::delete_post),
        )
        .route("/api/posts/:id/like", post(handlers::toggle_like))
        .route("/api/posts/:id/comments", post(handlers::add_comment))
        .route(
            "/api/posts/:id/comments/:comment_id",
            delete(handlers::delete_comment),
        )
        .with_state(state)
}
