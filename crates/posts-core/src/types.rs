//! Core types for posts-core

use chrono::{DateTime, Utc};
use postgate_auth_core::{Caller, Owned};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub const DEFAULT_CATEGORY: &str = "general";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const EXCERPT_LENGTH: usize = 150;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub author_id: String,
    pub author_username: String,
    pub category: String,
    pub tags: Vec<String>,
    pub published: bool,
    /// Ids of the users who liked the post
    pub likes: Vec<String>,
    pub comments: Vec<Comment>,
    pub view_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Drafts are visible to their author and to admins only.
    pub fn visible_to(&self, caller: Option<&Caller>) -> bool {
        self.published
            || caller.is_some_and(|c| c.is_admin() || c.id == self.author_id)
    }

    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likes.iter().any(|id| id == user_id)
    }

    pub fn comment(&self, comment_id: &str) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == comment_id)
    }
}

impl Owned for Post {
    fn owner_id(&self) -> &str {
        &self.author_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Owned for Comment {
    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 3, max = 200, message = "Title must be between 3 and 200 characters"))]
    #[validate(custom(function = "not_blank", message = "Title cannot be blank"))]
    pub title: String,

    #[validate(length(min = 10, message = "Content must be at least 10 characters"))]
    #[validate(custom(function = "not_blank", message = "Content cannot be blank"))]
    pub content: String,

    #[validate(length(max = 300, message = "Excerpt cannot exceed 300 characters"))]
    pub excerpt: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Category must be between 1 and 50 characters"))]
    pub category: Option<String>,

    #[serde(default)]
    #[validate(length(max = 10, message = "A post can have at most 10 tags"))]
    pub tags: Vec<String>,

    #[serde(default)]
    pub published: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 3, max = 200, message = "Title must be between 3 and 200 characters"))]
    #[validate(custom(function = "not_blank", message = "Title cannot be blank"))]
    pub title: Option<String>,

    #[validate(length(min = 10, message = "Content must be at least 10 characters"))]
    #[validate(custom(function = "not_blank", message = "Content cannot be blank"))]
    pub content: Option<String>,

    #[validate(length(max = 300, message = "Excerpt cannot exceed 300 characters"))]
    pub excerpt: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Category must be between 1 and 50 characters"))]
    pub category: Option<String>,

    #[validate(length(max = 10, message = "A post can have at most 10 tags"))]
    pub tags: Option<Vec<String>>,

    pub published: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 1, max = 500, message = "Comment must be between 1 and 500 characters"))]
    #[validate(custom(function = "not_blank", message = "Comment cannot be blank"))]
    pub content: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Query for listing posts
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostFilter {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub author: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PostFilter {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }
}

/// One page of a post listing
#[derive(Debug, Clone, Serialize)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub total: usize,
    pub page: u32,
    pub pages: u32,
}

/// Outcome of toggling a like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Like {
    pub liked: bool,
    pub likes: usize,
}

/// Lowercase, trim and dedupe tags, dropping empty ones.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

/// First [`EXCERPT_LENGTH`] characters of the content, with an ellipsis when cut.
pub fn excerpt_from(content: &str) -> String {
    let trimmed = content.trim();
    match trimmed.char_indices().nth(EXCERPT_LENGTH) {
        Some((cut, _)) => format!("{}...", trimmed[..cut].trim_end()),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postgate_auth_core::Role;

    fn caller(id: &str, role: Role) -> Caller {
        Caller {
            id: id.to_string(),
            username: id.to_string(),
            email: format!("{}@example.com", id),
            role,
        }
    }

    fn draft(author: &str) -> Post {
        let now = Utc::now();
        Post {
            id: Post::new_id(),
            title: "Draft".into(),
            slug: "draft".into(),
            content: "Not ready yet".into(),
            excerpt: String::new(),
            author_id: author.into(),
            author_username: author.into(),
            category: DEFAULT_CATEGORY.into(),
            tags: vec![],
            published: false,
            likes: vec![],
            comments: vec![],
            view_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_draft_visibility() {
        let post = draft("u1");
        assert!(!post.visible_to(None));
        assert!(!post.visible_to(Some(&caller("u2", Role::User))));
        assert!(post.visible_to(Some(&caller("u1", Role::User))));
        assert!(post.visible_to(Some(&caller("a1", Role::Admin))));
        assert_eq!(post.owner_id(), "u1");
    }

    #[test]
    fn test_filter_bounds() {
        let filter = PostFilter { page: Some(0), limit: Some(500), ..Default::default() };
        assert_eq!(filter.page(), 1);
        assert_eq!(filter.limit(), MAX_PAGE_SIZE);

        let filter = PostFilter { limit: Some(0), ..Default::default() };
        assert_eq!(filter.limit(), 1);
        assert_eq!(PostFilter::default().limit(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_normalize_tags() {
        let tags = vec![" Rust ".into(), "rust".into(), "".into(), "Web".into()];
        assert_eq!(normalize_tags(tags), vec!["rust", "web"]);
    }

    #[test]
    fn test_excerpt() {
        assert_eq!(excerpt_from("  short  "), "short");

        let long = "é".repeat(EXCERPT_LENGTH + 20);
        let excerpt = excerpt_from(&long);
        assert!(excerpt.ends_with("..."));
        assert_eq!(excerpt.chars().count(), EXCERPT_LENGTH + 3);
    }
}
