//! Post service
//!
//! Visibility and ownership rules for posts. Drafts only exist for their
//! author and admins; every other caller gets "not found" rather than a
//! denial, so a draft's existence is not disclosed.

use std::sync::Arc;

use chrono::Utc;
use postgate_auth_core::{authorize_ownership, Caller, Owned};
use tracing::{info, warn};
use validator::Validate;

use crate::post_store::PostStore;
use crate::slug::slugify;
use crate::types::{
    excerpt_from, normalize_tags, Comment, CommentRequest, CreatePostRequest, Like, Post,
    PostFilter, PostPage, UpdatePostRequest, DEFAULT_CATEGORY,
};
use crate::{PostError, Result};

pub struct PostService {
    store: Arc<dyn PostStore>,
}

impl PostService {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, caller: Option<&Caller>, filter: PostFilter) -> Result<PostPage> {
        let category = filter.category.as_deref().map(str::to_lowercase);
        let tag = filter.tag.as_deref().map(str::to_lowercase);

        let matching: Vec<Post> = self
            .store
            .list_posts()
            .await?
            .into_iter()
            .filter(|post| post.visible_to(caller))
            .filter(|post| category.as_ref().map_or(true, |c| post.category == *c))
            .filter(|post| tag.as_ref().map_or(true, |t| post.tags.contains(t)))
            .filter(|post| {
                filter
                    .author
                    .as_ref()
                    .map_or(true, |a| post.author_id == *a)
            })
            .collect();

        let page = filter.page();
        let limit = filter.limit();
        let total = matching.len();
        let pages = total.div_ceil(limit as usize) as u32;
        let posts = matching
            .into_iter()
            .skip((page as usize - 1) * limit as usize)
            .take(limit as usize)
            .collect();

        Ok(PostPage { posts, total, page, pages })
    }

    /// Fetch a post and count the view.
    pub async fn get(&self, caller: Option<&Caller>, id: &str) -> Result<Post> {
        self.visible(caller, id).await?;
        self.store
            .record_view(id)
            .await?
            .ok_or_else(|| PostError::NotFound(id.to_string()))
    }

    pub async fn create(&self, caller: &Caller, request: CreatePostRequest) -> Result<Post> {
        request.validate()?;

        let now = Utc::now();
        let excerpt = match request.excerpt {
            Some(excerpt) if !excerpt.trim().is_empty() => excerpt.trim().to_string(),
            _ => excerpt_from(&request.content),
        };
        let post = self
            .store
            .insert_post(Post {
                id: Post::new_id(),
                title: request.title.trim().to_string(),
                slug: slugify(&request.title),
                content: request.content,
                excerpt,
                author_id: caller.id.clone(),
                author_username: caller.username.clone(),
                category: normalize_category(request.category),
                tags: normalize_tags(request.tags),
                published: request.published,
                likes: Vec::new(),
                comments: Vec::new(),
                view_count: 0,
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!(post_id = %post.id, slug = %post.slug, author = %caller.id, "Created post");
        Ok(post)
    }

    /// Author or admin only. The slug stays fixed when the title changes.
    pub async fn update(
        &self,
        caller: &Caller,
        id: &str,
        request: UpdatePostRequest,
    ) -> Result<Post> {
        request.validate()?;
        let mut post = self.visible(Some(caller), id).await?;
        self.authorize_owner(caller, &post, "update post")?;

        if let Some(title) = request.title {
            post.title = title.trim().to_string();
        }
        if let Some(content) = request.content {
            if request.excerpt.is_none() {
                post.excerpt = excerpt_from(&content);
            }
            post.content = content;
        }
        if let Some(excerpt) = request.excerpt {
            post.excerpt = excerpt.trim().to_string();
        }
        if let Some(category) = request.category {
            post.category = normalize_category(Some(category));
        }
        if let Some(tags) = request.tags {
            post.tags = normalize_tags(tags);
        }
        if let Some(published) = request.published {
            post.published = published;
        }
        post.updated_at = Utc::now();

        let post = self.store.save_post(post).await?;
        info!(post_id = %post.id, by = %caller.id, "Updated post");
        Ok(post)
    }

    /// Author or admin only.
    pub async fn delete(&self, caller: &Caller, id: &str) -> Result<()> {
        let post = self.visible(Some(caller), id).await?;
        self.authorize_owner(caller, &post, "delete post")?;

        if !self.store.delete_post(id).await? {
            return Err(PostError::NotFound(id.to_string()));
        }
        info!(post_id = %id, by = %caller.id, "Deleted post");
        Ok(())
    }

    /// Like the post, or remove an existing like.
    pub async fn toggle_like(&self, caller: &Caller, id: &str) -> Result<Like> {
        self.visible(Some(caller), id).await?;
        let post = self
            .store
            .toggle_like(id, &caller.id)
            .await?
            .ok_or_else(|| PostError::NotFound(id.to_string()))?;
        Ok(Like {
            liked: post.is_liked_by(&caller.id),
            likes: post.likes.len(),
        })
    }

    pub async fn add_comment(
        &self,
        caller: &Caller,
        id: &str,
        request: CommentRequest,
    ) -> Result<Comment> {
        request.validate()?;
        self.visible(Some(caller), id).await?;

        let content = request.content.trim().to_string();
        if content.is_empty() {
            return Err(PostError::Validation(vec!["Comment cannot be empty".to_string()]));
        }
        let comment = Comment {
            id: Post::new_id(),
            user_id: caller.id.clone(),
            username: caller.username.clone(),
            content,
            created_at: Utc::now(),
        };
        self.store
            .push_comment(id, comment.clone())
            .await?
            .ok_or_else(|| PostError::NotFound(id.to_string()))?;

        info!(post_id = %id, comment_id = %comment.id, by = %caller.id, "Added comment");
        Ok(comment)
    }

    /// Comment author or admin only.
    pub async fn delete_comment(&self, caller: &Caller, id: &str, comment_id: &str) -> Result<()> {
        let post = self.visible(Some(caller), id).await?;
        let comment = post
            .comment(comment_id)
            .ok_or_else(|| PostError::CommentNotFound(comment_id.to_string()))?;
        self.authorize_owner(caller, comment, "delete comment")?;

        self.store
            .remove_comment(id, comment_id)
            .await?
            .ok_or_else(|| PostError::NotFound(id.to_string()))?;
        info!(post_id = %id, comment_id = %comment_id, by = %caller.id, "Deleted comment");
        Ok(())
    }

    async fn visible(&self, caller: Option<&Caller>, id: &str) -> Result<Post> {
        match self.store.get_post(id).await? {
            Some(post) if post.visible_to(caller) => Ok(post),
            _ => Err(PostError::NotFound(id.to_string())),
        }
    }

    fn authorize_owner(&self, caller: &Caller, resource: &impl Owned, action: &str) -> Result<()> {
        authorize_ownership(Some(caller), resource.owner_id())
            .into_result()
            .map_err(|err| {
                warn!(caller = %caller.id, owner = %resource.owner_id(), action, "Ownership check failed");
                err.into()
            })
    }
}

fn normalize_category(category: Option<String>) -> String {
    category
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
}
