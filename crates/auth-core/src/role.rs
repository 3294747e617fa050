//! Role hierarchy

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Permission level of an account.
///
/// Variants are declared lowest to highest, so the derived `Ord` is the
/// hierarchy: `User < Admin`. New levels slot in by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::User, Role::Admin];

    /// Exact, case-sensitive parse of a wire role name.
    pub fn parse(name: &str) -> Option<Role> {
        match name {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// True if this role ranks at or above `required`.
    pub fn satisfies(self, required: Role) -> bool {
        self >= required
    }

    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Compare two untrusted role names.
///
/// Absent or unknown names on either side never grant anything.
pub fn has_role(caller_role: Option<&str>, required_role: Option<&str>) -> bool {
    match (caller_role.and_then(Role::parse), required_role.and_then(Role::parse)) {
        (Some(caller), Some(required)) => caller.satisfies(required),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hierarchy_order() {
        assert!(Role::Admin > Role::User);
        assert!(Role::Admin.satisfies(Role::User));
        assert!(Role::User.satisfies(Role::User));
        assert!(!Role::User.satisfies(Role::Admin));
    }

    #[test]
    fn test_has_role_truth_table() {
        assert!(has_role(Some("admin"), Some("user")));
        assert!(!has_role(Some("user"), Some("admin")));
        assert!(has_role(Some("user"), Some("user")));
        assert!(has_role(Some("admin"), Some("admin")));
        assert!(!has_role(None, Some("user")));
        assert!(!has_role(Some("user"), None));
        assert!(!has_role(None, None));
    }

    #[test]
    fn test_unknown_roles_never_grant() {
        assert!(!has_role(Some("superuser"), Some("user")));
        assert!(!has_role(Some("Admin"), Some("user")));
        assert!(!has_role(Some("admin"), Some("moderator")));
        assert!(!has_role(Some(""), Some("")));
    }

    #[test]
    fn test_wire_names_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(role));
            assert_eq!(role.as_str().parse::<Role>().ok(), Some(role));
        }
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert!(serde_json::from_str::<Role>("\"root\"").is_err());
    }
}
