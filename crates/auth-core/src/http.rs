//! axum integration: caller extractors and error responses
//!
//! Handlers declare [`RequireCaller`] to become protected endpoints, or
//! [`MaybeCaller`] when anonymous access is allowed but a valid token changes
//! what is visible. The router state must provide an [`Authenticator`]
//! through `FromRef`.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{AuthError, Authenticator, Caller};

/// An authenticated caller; extraction fails with the matching [`AuthError`].
#[derive(Debug, Clone)]
pub struct RequireCaller(pub Caller);

/// A caller if the request carried a usable token, otherwise `None`.
#[derive(Debug, Clone)]
pub struct MaybeCaller(pub Option<Caller>);

fn authorization(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

#[async_trait]
impl<S> FromRequestParts<S> for RequireCaller
where
    Authenticator: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let authenticator = Authenticator::from_ref(state);
        authenticator
            .authenticate(authorization(parts))
            .await
            .map(RequireCaller)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeCaller
where
    Authenticator: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let authenticator = Authenticator::from_ref(state);
        Ok(MaybeCaller(
            authenticator.authenticate_optional(authorization(parts)).await,
        ))
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::Config(_) | AuthError::Internal(_) | AuthError::InvalidIdentity(_) = &self {
            tracing::error!(error = %self, "Auth layer failure");
        }
        let body = Json(json!({
            "success": false,
            "message": self.public_message(),
        }));
        (self.status_code(), body).into_response()
    }
}
