//! # Users-Core
//!
//! User accounts for postgate.
//!
//! This crate provides:
//! - User storage behind the [`UserStore`] trait, with an in-memory backend
//! - Password hashing with Argon2id and registration password rules
//! - Registration and login, returning session tokens from auth-core
//! - Admin account management (roles, activation)
//! - REST API for the above
//!
//! ## Architecture
//!
//! Users-Core owns accounts and credentials. Token signing, verification and
//! every allow/deny decision live in `postgate-auth-core`; this crate calls
//! into it rather than re-implementing any policy.

pub mod error;
pub mod types;
pub mod validation;
pub mod password;
pub mod user_store;
pub mod auth;
pub mod api;
pub mod config;

use std::sync::Arc;

pub use error::{Error, Result};
pub use types::{
    LoginRequest, RegisterRequest, SetRoleRequest, SetStatusRequest, UpdateUserRequest, User,
    UserFilter,
};
pub use auth::{AuthenticationResult, AuthenticationService};
pub use user_store::{InMemoryUserStore, UserStore};
pub use config::{PasswordConfig, UsersConfig};

use postgate_auth_core::{Authenticator, TokenService};

/// Everything a host needs to serve account routes and authenticate callers.
pub struct UsersService {
    pub auth_service: Arc<AuthenticationService>,
    pub authenticator: Authenticator,
    pub store: InMemoryUserStore,
}

impl UsersService {
    pub fn api_state(&self) -> api::ApiState {
        api::ApiState {
            auth_service: self.auth_service.clone(),
            authenticator: self.authenticator.clone(),
        }
    }
}

/// Initialize the users-core service
///
/// Fails if the token configuration is unusable, e.g. no signing secret.
pub fn init(config: &UsersConfig) -> Result<UsersService> {
    let tokens = Arc::new(TokenService::new(config.token.clone())?);
    let store = InMemoryUserStore::new();

    let auth_service = AuthenticationService::new(
        Arc::new(store.clone()),
        tokens.clone(),
        &config.password,
    )?;
    let authenticator = Authenticator::new(tokens, Arc::new(store.clone()));

    Ok(UsersService {
        auth_service: Arc::new(auth_service),
        authenticator,
        store,
    })
}
