//! Error types for posts-core

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use postgate_auth_core::AuthError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PostError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Post not found: {0}")]
    NotFound(String),

    #[error("Comment not found: {0}")]
    CommentNotFound(String),

    #[error("Validation failed")]
    Validation(Vec<String>),
}

pub type Result<T> = std::result::Result<T, PostError>;

impl From<validator::ValidationErrors> for PostError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        messages.sort();
        PostError::Validation(messages)
    }
}

impl IntoResponse for PostError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            PostError::Auth(err) => return err.into_response(),
            PostError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                json!({ "success": false, "message": "Post not found" }),
            ),
            PostError::CommentNotFound(_) => (
                StatusCode::NOT_FOUND,
                json!({ "success": false, "message": "Comment not found" }),
            ),
            PostError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "message": "Validation failed", "errors": errors }),
            ),
        };
        (status, Json(body)).into_response()
    }
}
