//! Error types for users-core

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use postgate_auth_core::AuthError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Policy or token failure; rendered exactly as auth-core defines it.
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("User already exists: {0}")]
    UserAlreadyExists(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Validation failed")]
    Validation(Vec<String>),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
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
        Error::Validation(messages)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Error::Auth(err) => return err.into_response(),
            Error::UserAlreadyExists(_) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "message": "User already exists" }),
            ),
            Error::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({ "success": false, "message": "Invalid credentials" }),
            ),
            Error::NotFound(_) => (
                StatusCode::NOT_FOUND,
                json!({ "success": false, "message": "User not found" }),
            ),
            Error::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "message": "Validation failed", "errors": errors }),
            ),
            err @ (Error::PasswordHash(_) | Error::Config(_)) => {
                tracing::error!(error = %err, "Users service failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "success": false, "message": "Server error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
