//! Access policy evaluation
//!
//! Pure functions from (caller, target) to a [`Decision`]. No state, no I/O:
//! the same inputs always produce the same decision.

use serde::{Deserialize, Serialize};

use crate::{AuthError, Role};

/// An authenticated principal as seen by policy checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Anything with a single owning account.
pub trait Owned {
    fn owner_id(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    Unauthenticated,
    InsufficientRole,
    NotOwner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied(Denial),
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        self == Decision::Allowed
    }

    pub fn into_result(self) -> Result<(), AuthError> {
        match self {
            Decision::Allowed => Ok(()),
            Decision::Denied(denial) => Err(denial.into()),
        }
    }
}

impl From<Denial> for AuthError {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::Unauthenticated => AuthError::Unauthenticated,
            Denial::InsufficientRole => AuthError::InsufficientRole,
            Denial::NotOwner => AuthError::NotOwner,
        }
    }
}

pub fn authorize_role(caller: Option<&Caller>, required: Role) -> Decision {
    match caller {
        None => Decision::Denied(Denial::Unauthenticated),
        Some(caller) if caller.role.satisfies(required) => Decision::Allowed,
        Some(_) => Decision::Denied(Denial::InsufficientRole),
    }
}

/// Admins may act on any resource; everyone else only on their own.
///
/// Ids are compared as strings, so a claim id and a freshly loaded record id
/// match whenever they name the same account.
pub fn authorize_ownership(caller: Option<&Caller>, owner_id: &str) -> Decision {
    match caller {
        None => Decision::Denied(Denial::Unauthenticated),
        Some(caller) if caller.is_admin() => Decision::Allowed,
        Some(caller) if caller.id == owner_id => Decision::Allowed,
        Some(_) => Decision::Denied(Denial::NotOwner),
    }
}
