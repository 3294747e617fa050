//! Post persistence
//!
//! Single-post mutations (views, likes, comments) are store operations so a
//! backend can apply them atomically instead of read-modify-write.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::slug::with_suffix;
use crate::types::{Comment, Post};
use crate::{PostError, Result};

#[async_trait]
pub trait PostStore: Send + Sync {
    /// Store a new post. A taken slug gets the first free `-1`, `-2`, ...
    /// suffix, chosen atomically with the insert.
    async fn insert_post(&self, post: Post) -> Result<Post>;
    async fn get_post(&self, id: &str) -> Result<Option<Post>>;
    /// Every post, newest first.
    async fn list_posts(&self) -> Result<Vec<Post>>;
    /// Replace an existing post. The slug is not re-indexed.
    async fn save_post(&self, post: Post) -> Result<Post>;
    async fn delete_post(&self, id: &str) -> Result<bool>;
    async fn record_view(&self, id: &str) -> Result<Option<Post>>;
    /// Add the like if absent, remove it otherwise.
    async fn toggle_like(&self, id: &str, user_id: &str) -> Result<Option<Post>>;
    async fn push_comment(&self, id: &str, comment: Comment) -> Result<Option<Post>>;
    /// `Ok(None)` if the post is missing; `CommentNotFound` if the comment is.
    async fn remove_comment(&self, id: &str, comment_id: &str) -> Result<Option<Post>>;
}

#[derive(Default)]
struct Inner {
    posts: HashMap<String, Post>,
    by_slug: HashMap<String, String>,
}

#[derive(Clone, Default)]
pub struct InMemoryPostStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn modify(&self, id: &str, f: impl FnOnce(&mut Post) -> Result<()>) -> Result<Option<Post>> {
        let mut inner = self.inner.write();
        let Some(post) = inner.posts.get_mut(id) else {
            return Ok(None);
        };
        f(post)?;
        Ok(Some(post.clone()))
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn insert_post(&self, mut post: Post) -> Result<Post> {
        let mut inner = self.inner.write();
        if inner.by_slug.contains_key(&post.slug) {
            let base = std::mem::take(&mut post.slug);
            post.slug = (1u32..)
                .map(|n| with_suffix(&base, n))
                .find(|candidate| !inner.by_slug.contains_key(candidate))
                .unwrap_or(base);
        }
        inner.by_slug.insert(post.slug.clone(), post.id.clone());
        inner.posts.insert(post.id.clone(), post.clone());
        Ok(post)
    }

    async fn get_post(&self, id: &str) -> Result<Option<Post>> {
        Ok(self.inner.read().posts.get(id).cloned())
    }

    async fn list_posts(&self) -> Result<Vec<Post>> {
        let mut posts: Vec<Post> = self.inner.read().posts.values().cloned().collect();
        posts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(posts)
    }

    async fn save_post(&self, post: Post) -> Result<Post> {
        let mut inner = self.inner.write();
        match inner.posts.get_mut(&post.id) {
            Some(existing) => {
                *existing = post.clone();
                Ok(post)
            }
            None => Err(PostError::NotFound(post.id)),
        }
    }

    async fn delete_post(&self, id: &str) -> Result<bool> {
        let mut inner = self.inner.write();
        match inner.posts.remove(id) {
            Some(post) => {
                inner.by_slug.remove(&post.slug);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn record_view(&self, id: &str) -> Result<Option<Post>> {
        self.modify(id, |post| {
            post.view_count += 1;
            Ok(())
        })
    }

    async fn toggle_like(&self, id: &str, user_id: &str) -> Result<Option<Post>> {
        self.modify(id, |post| {
            match post.likes.iter().position(|liker| liker == user_id) {
                Some(index) => {
                    post.likes.remove(index);
                }
                None => post.likes.push(user_id.to_string()),
            }
            Ok(())
        })
    }

    async fn push_comment(&self, id: &str, comment: Comment) -> Result<Option<Post>> {
        self.modify(id, |post| {
            post.comments.push(comment);
            post.updated_at = Utc::now();
            Ok(())
        })
    }

    async fn remove_comment(&self, id: &str, comment_id: &str) -> Result<Option<Post>> {
        self.modify(id, |post| {
            let index = post
                .comments
                .iter()
                .position(|c| c.id == comment_id)
                .ok_or_else(|| PostError::CommentNotFound(comment_id.to_string()))?;
            post.comments.remove(index);
            post.updated_at = Utc::now();
            Ok(())
        })
    }
}
