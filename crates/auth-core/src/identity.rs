//! Identity lookup and request authentication

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{extract_bearer, AuthError, Caller, Result, Role, TokenService};

/// Account facts the auth layer needs, as reported by the owning store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub active: bool,
}

impl From<&Identity> for Caller {
    fn from(identity: &Identity) -> Self {
        Caller {
            id: identity.id.clone(),
            username: identity.username.clone(),
            email: identity.email.clone(),
            role: identity.role,
        }
    }
}

/// Lookup of accounts by id
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_identity(&self, id: &str) -> Result<Option<Identity>>;
}

/// Resolves an `Authorization` header into a live [`Caller`].
///
/// The token proves who the caller was at login; the store is consulted on
/// every request so deleted or deactivated accounts are turned away even
/// while their tokens still verify.
#[derive(Clone)]
pub struct Authenticator {
    tokens: Arc<TokenService>,
    identities: Arc<dyn IdentityStore>,
}

impl Authenticator {
    pub fn new(tokens: Arc<TokenService>, identities: Arc<dyn IdentityStore>) -> Self {
        Self { tokens, identities }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<Caller> {
        let token = extract_bearer(authorization).ok_or(AuthError::MissingToken)?;
        let claims = self.tokens.verify(token)?;

        let identity = match self.identities.find_identity(&claims.id).await? {
            Some(identity) => identity,
            None => {
                warn!(user_id = %claims.id, "Token subject no longer exists");
                return Err(AuthError::UserNotFound);
            }
        };

        if !identity.active {
            warn!(user_id = %identity.id, "Rejected token for deactivated account");
            return Err(AuthError::AccountDeactivated);
        }

        debug!(user_id = %identity.id, role = %identity.role, "Authenticated request");
        Ok(Caller::from(&identity))
    }

    /// Like [`authenticate`](Self::authenticate) but any failure just means
    /// an anonymous caller.
    pub async fn authenticate_optional(&self, authorization: Option<&str>) -> Option<Caller> {
        authorization?;
        self.authenticate(authorization).await.ok()
    }
}
