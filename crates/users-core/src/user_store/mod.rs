//! User persistence
//!
//! [`UserStore`] is the seam to whatever database backs the service.
//! [`InMemoryUserStore`] keeps everything in a `RwLock`ed map and is what the
//! server and the tests run against.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use postgate_auth_core::{self as auth, Identity, IdentityStore};

use crate::types::{User, UserChanges, UserFilter};
use crate::validation::normalize_key;
use crate::{Error, Result};

const DEFAULT_LIST_LIMIT: u32 = 50;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a fully prepared user. Fails if the username or email is taken.
    async fn create_user(&self, user: User) -> Result<User>;
    async fn get_user(&self, id: &str) -> Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn update_user(&self, id: &str, changes: UserChanges) -> Result<User>;
    async fn list_users(&self, filter: UserFilter) -> Result<Vec<User>>;
}

#[derive(Default)]
struct Inner {
    users: HashMap<String, User>,
    by_username: HashMap<String, String>,
    by_email: HashMap<String, String>,
}

#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create_user(&self, user: User) -> Result<User> {
        let mut inner = self.inner.write();
        let username_key = normalize_key(&user.username);
        let email_key = normalize_key(&user.email);

        if inner.by_username.contains_key(&username_key) {
            return Err(Error::UserAlreadyExists(user.username));
        }
        if inner.by_email.contains_key(&email_key) {
            return Err(Error::UserAlreadyExists(user.email));
        }

        inner.by_username.insert(username_key, user.id.clone());
        inner.by_email.insert(email_key, user.id.clone());
        inner.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>> {
        Ok(self.inner.read().users.get(id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let inner = self.inner.read();
        Ok(inner
            .by_username
            .get(&normalize_key(username))
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let inner = self.inner.read();
        Ok(inner
            .by_email
            .get(&normalize_key(email))
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn update_user(&self, id: &str, changes: UserChanges) -> Result<User> {
        let mut inner = self.inner.write();
        let current = inner
            .users
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        // Check uniqueness before touching any index.
        let new_username = changes
            .username
            .as_ref()
            .filter(|name| normalize_key(name) != normalize_key(&current.username));
        let new_email = changes
            .email
            .as_ref()
            .filter(|email| normalize_key(email) != normalize_key(&current.email));

        if let Some(name) = new_username {
            if inner.by_username.contains_key(&normalize_key(name)) {
                return Err(Error::UserAlreadyExists(name.clone()));
            }
        }
        if let Some(email) = new_email {
            if inner.by_email.contains_key(&normalize_key(email)) {
                return Err(Error::UserAlreadyExists(email.clone()));
            }
        }

        let mut user = current;
        if let Some(name) = changes.username {
            inner.by_username.remove(&normalize_key(&user.username));
            inner.by_username.insert(normalize_key(&name), user.id.clone());
            user.username = name;
        }
        if let Some(email) = changes.email {
            inner.by_email.remove(&normalize_key(&user.email));
            inner.by_email.insert(normalize_key(&email), user.id.clone());
            user.email = email;
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        if let Some(active) = changes.active {
            user.active = active;
        }
        if let Some(last_login) = changes.last_login {
            user.last_login = Some(last_login);
        }
        user.updated_at = Utc::now();

        inner.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn list_users(&self, filter: UserFilter) -> Result<Vec<User>> {
        let inner = self.inner.read();
        let search = filter.search.as_deref().map(str::to_lowercase);

        let mut users: Vec<User> = inner
            .users
            .values()
            .filter(|u| filter.active.map_or(true, |active| u.active == active))
            .filter(|u| filter.role.map_or(true, |role| u.role == role))
            .filter(|u| {
                search.as_deref().map_or(true, |term| {
                    u.username.to_lowercase().contains(term) || u.email.to_lowercase().contains(term)
                })
            })
            .cloned()
            .collect();

        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        let offset = filter.offset.unwrap_or(0) as usize;
        let limit = filter.limit.unwrap_or(DEFAULT_LIST_LIMIT) as usize;
        Ok(users.into_iter().skip(offset).take(limit).collect())
    }
}

#[async_trait]
impl IdentityStore for InMemoryUserStore {
    async fn find_identity(&self, id: &str) -> auth::Result<Option<Identity>> {
        Ok(self.inner.read().users.get(id).map(User::identity))
    }
}
