//! # Posts-Core
//!
//! Blog posts for postgate: drafts and published posts, likes and comments.
//!
//! Who may see or change a post is decided by `postgate-auth-core`. A post
//! implements [`postgate_auth_core::Owned`] through its author, so editing and
//! deleting go through the same ownership check as user profiles.

pub mod error;
pub mod types;
pub mod slug;
pub mod post_store;
pub mod service;
pub mod api;

use std::sync::Arc;

pub use error::{PostError, Result};
pub use types::{
    Comment, CommentRequest, CreatePostRequest, Like, Post, PostFilter, PostPage,
    UpdatePostRequest,
};
pub use post_store::{InMemoryPostStore, PostStore};
pub use service::PostService;

use postgate_auth_core::Authenticator;

/// Posts routes plus the store they run against.
pub struct PostsService {
    pub service: Arc<PostService>,
    pub authenticator: Authenticator,
    pub store: InMemoryPostStore,
}

impl PostsService {
    pub fn api_state(&self) -> api::PostsState {
        api::PostsState {
            service: self.service.clone(),
            authenticator: self.authenticator.clone(),
        }
    }
}

/// Initialize posts-core on an in-memory store.
///
/// The authenticator is shared with users-core so both route sets resolve
/// callers against the same accounts.
pub fn init(authenticator: Authenticator) -> PostsService {
    let store = InMemoryPostStore::new();
    let service = PostService::new(Arc::new(store.clone()));
    PostsService {
        service: Arc::new(service),
        authenticator,
        store,
    }
}
