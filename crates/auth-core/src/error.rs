//! Error types for authentication and authorization
//!
//! Every variant except [`AuthError::Config`] is an expected, per-request
//! outcome. Each one maps to a fixed HTTP status and public message; the
//! messages are part of the external contract and must not change.

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No bearer token was presented.
    #[error("Access token is required")]
    MissingToken,

    /// A token was presented but failed signature, structure or expiry checks.
    /// The reason is not carried.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// No caller reached a role or ownership check.
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Access denied - insufficient permissions")]
    InsufficientRole,

    #[error("Access denied - you can only access your own resources")]
    NotOwner,

    #[error("User not found")]
    UserNotFound,

    #[error("Account is deactivated")]
    AccountDeactivated,

    /// Tried to issue a token for an identity missing a required claim.
    #[error("Identity is missing required claim: {0}")]
    InvalidIdentity(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;

impl AuthError {
    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::Unauthenticated
            | AuthError::UserNotFound
            | AuthError::AccountDeactivated => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientRole | AuthError::NotOwner => StatusCode::FORBIDDEN,
            AuthError::InvalidIdentity(_) | AuthError::Config(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show to clients. Server-side failures never leak details.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "Access token is required",
            AuthError::InvalidToken => "Invalid or expired token",
            AuthError::Unauthenticated => "Authentication required",
            AuthError::InsufficientRole => "Access denied - insufficient permissions",
            AuthError::NotOwner => "Access denied - you can only access your own resources",
            AuthError::UserNotFound => "User not found",
            AuthError::AccountDeactivated => "Account is deactivated",
            AuthError::InvalidIdentity(_) | AuthError::Config(_) | AuthError::Internal(_) => {
                "Server error"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denials_map_to_contract_statuses() {
        assert_eq!(AuthError::MissingToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::UserNotFound.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::AccountDeactivated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::InsufficientRole.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AuthError::NotOwner.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = AuthError::Internal("signing key exploded".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Server error");
    }

    #[test]
    fn test_display_matches_public_message_for_denials() {
        for err in [
            AuthError::MissingToken,
            AuthError::InvalidToken,
            AuthError::Unauthenticated,
            AuthError::InsufficientRole,
            AuthError::NotOwner,
            AuthError::UserNotFound,
            AuthError::AccountDeactivated,
        ] {
            assert_eq!(err.to_string(), err.public_message());
        }
    }
}
