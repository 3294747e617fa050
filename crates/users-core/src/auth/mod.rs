//! Authentication service
//!
//! Registration, login and account administration. Every account mutation
//! goes through the shared access policy before it reaches the store.

use std::sync::Arc;

use chrono::Utc;
use postgate_auth_core::{
    authorize_ownership, authorize_role, AuthError, Caller, Role, TokenService,
};
use serde::Serialize;
use tracing::{info, warn};
use validator::Validate;

use crate::config::PasswordConfig;
use crate::password::PasswordHasher;
use crate::types::{
    LoginRequest, RegisterRequest, UpdateUserRequest, User, UserChanges, UserFilter,
};
use crate::user_store::UserStore;
use crate::validation::{validate_search_input, PasswordPolicy, PasswordValidator};
use crate::{Error, Result};

/// Result of a successful register or login
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticationResult {
    pub user: User,
    pub token: String,
    pub expires_in: i64,
}

pub struct AuthenticationService {
    store: Arc<dyn UserStore>,
    tokens: Arc<TokenService>,
    hasher: PasswordHasher,
    password_validator: PasswordValidator,
    /// Verified against when the email is unknown, so both failures cost one hash.
    dummy_hash: String,
}

impl AuthenticationService {
    pub fn new(
        store: Arc<dyn UserStore>,
        tokens: Arc<TokenService>,
        config: &PasswordConfig,
    ) -> Result<Self> {
        let hasher = PasswordHasher::new(config)?;
        let dummy_hash = hasher.hash("postgate-unknown-account")?;
        Ok(Self {
            store,
            tokens,
            hasher,
            password_validator: PasswordValidator::new(PasswordPolicy::from(config)),
            dummy_hash,
        })
    }

    pub fn tokens(&self) -> &Arc<TokenService> {
        &self.tokens
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<AuthenticationResult> {
        request.validate()?;
        self.password_validator
            .validate(&request.password, &request.username)
            .map_err(|e| Error::Validation(vec![e.to_string()]))?;

        if self.store.get_user_by_email(&request.email).await?.is_some() {
            return Err(Error::UserAlreadyExists(request.email));
        }
        if self.store.get_user_by_username(&request.username).await?.is_some() {
            return Err(Error::UserAlreadyExists(request.username));
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let now = Utc::now();
        let user = self
            .store
            .create_user(User {
                id: User::new_id(),
                username: request.username,
                email: request.email.trim().to_lowercase(),
                password_hash,
                role: Role::User,
                active: true,
                created_at: now,
                updated_at: now,
                last_login: None,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "Registered user");
        self.issue(user)
    }

    /// Unknown email and wrong password produce the same error in the same time.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthenticationResult> {
        request.validate()?;

        let found = self.store.get_user_by_email(&request.email).await?;
        let encoded = found
            .as_ref()
            .map_or(self.dummy_hash.as_str(), |user| user.password_hash.as_str());
        let password_ok = self.hasher.verify(&request.password, encoded);

        let user = match found {
            Some(user) if password_ok => user,
            _ => {
                warn!("Failed login attempt");
                return Err(Error::InvalidCredentials);
            }
        };

        if !user.active {
            warn!(user_id = %user.id, "Login attempt on deactivated account");
            return Err(AuthError::AccountDeactivated.into());
        }

        let user = self
            .store
            .update_user(
                &user.id,
                UserChanges {
                    last_login: Some(Utc::now()),
                    ..Default::default()
                },
            )
            .await?;

        info!(user_id = %user.id, "User logged in");
        self.issue(user)
    }

    pub async fn current_user(&self, caller: &Caller) -> Result<User> {
        self.store
            .get_user(&caller.id)
            .await?
            .ok_or_else(|| AuthError::UserNotFound.into())
    }

    /// Owners may edit their own profile; admins may edit anyone's.
    pub async fn update_profile(
        &self,
        caller: &Caller,
        user_id: &str,
        request: UpdateUserRequest,
    ) -> Result<User> {
        request.validate()?;
        authorize_ownership(Some(caller), user_id).into_result()?;

        let user = self
            .store
            .update_user(
                user_id,
                UserChanges {
                    username: request.username,
                    email: request.email.map(|e| e.trim().to_lowercase()),
                    ..Default::default()
                },
            )
            .await?;
        info!(user_id = %user.id, by = %caller.id, "Updated profile");
        Ok(user)
    }

    /// Takes effect on the user's next issued token.
    pub async fn set_role(&self, caller: &Caller, user_id: &str, role: Role) -> Result<User> {
        authorize_role(Some(caller), Role::Admin).into_result()?;
        let user = self
            .store
            .update_user(
                user_id,
                UserChanges {
                    role: Some(role),
                    ..Default::default()
                },
            )
            .await?;
        info!(user_id = %user.id, role = %role, by = %caller.id, "Changed role");
        Ok(user)
    }

    pub async fn set_active(&self, caller: &Caller, user_id: &str, active: bool) -> Result<User> {
        authorize_role(Some(caller), Role::Admin).into_result()?;
        let user = self
            .store
            .update_user(
                user_id,
                UserChanges {
                    active: Some(active),
                    ..Default::default()
                },
            )
            .await?;
        info!(user_id = %user.id, active, by = %caller.id, "Changed account status");
        Ok(user)
    }

    pub async fn list_users(&self, caller: &Caller, mut filter: UserFilter) -> Result<Vec<User>> {
        authorize_role(Some(caller), Role::Admin).into_result()?;
        if let Some(search) = filter.search.take() {
            filter.search = Some(
                validate_search_input(&search)
                    .map_err(|_| Error::Validation(vec!["Invalid search term".to_string()]))?,
            );
        }
        self.store.list_users(filter).await
    }

    fn issue(&self, user: User) -> Result<AuthenticationResult> {
        let token = self.tokens.issue(&user.identity())?;
        Ok(AuthenticationResult {
            user,
            token,
            expires_in: self.tokens.ttl().num_seconds(),
        })
    }
}
