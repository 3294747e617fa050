//! Input validation rules for accounts

use std::borrow::Cow;
use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

use crate::config::PasswordConfig;

static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_]{3,30}$").expect("username pattern is valid")
});

static COMMON_PASSWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "password", "123456", "password1", "password123", "12345678", "qwerty", "abc123",
        "letmein", "welcome", "monkey", "dragon", "111111", "iloveyou", "admin123",
        "qwerty123", "changeme", "passw0rd", "trustno1",
    ]
    .into_iter()
    .collect()
});

const MAX_PASSWORD_LENGTH: usize = 128;

/// Password rules applied at registration
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
    pub require_letter: bool,
    pub require_number: bool,
    pub disallow_common_passwords: bool,
    pub disallow_username_in_password: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 6,
            max_length: MAX_PASSWORD_LENGTH,
            require_letter: true,
            require_number: true,
            disallow_common_passwords: true,
            disallow_username_in_password: false,
        }
    }
}

impl From<&PasswordConfig> for PasswordPolicy {
    fn from(config: &PasswordConfig) -> Self {
        Self {
            min_length: config.min_length,
            require_letter: config.require_letter,
            require_number: config.require_number,
            disallow_username_in_password: config.disallow_username_in_password,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordError {
    #[error("Password must be at least {0} characters")]
    TooShort(usize),

    #[error("Password must not exceed {0} characters")]
    TooLong(usize),

    #[error("Password must contain at least one letter")]
    MissingLetter,

    #[error("Password must contain at least one number")]
    MissingNumber,

    #[error("Password must not contain your username")]
    ContainsUsername,

    #[error("This password is too common")]
    CommonPassword,
}

pub struct PasswordValidator {
    policy: PasswordPolicy,
}

impl PasswordValidator {
    pub fn new(policy: PasswordPolicy) -> Self {
        Self { policy }
    }

    pub fn with_default_policy() -> Self {
        Self::new(PasswordPolicy::default())
    }

    pub fn validate(&self, password: &str, username: &str) -> Result<(), PasswordError> {
        let length = password.chars().count();
        if length < self.policy.min_length {
            return Err(PasswordError::TooShort(self.policy.min_length));
        }
        if length > self.policy.max_length {
            return Err(PasswordError::TooLong(self.policy.max_length));
        }

        if self.policy.require_letter && !password.chars().any(char::is_alphabetic) {
            return Err(PasswordError::MissingLetter);
        }
        if self.policy.require_number && !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(PasswordError::MissingNumber);
        }

        if self.policy.disallow_username_in_password && !username.is_empty() {
            if password.to_lowercase().contains(&username.to_lowercase()) {
                return Err(PasswordError::ContainsUsername);
            }
        }

        if self.policy.disallow_common_passwords
            && COMMON_PASSWORDS.contains(password.to_lowercase().as_str())
        {
            return Err(PasswordError::CommonPassword);
        }

        Ok(())
    }
}

/// Letters, digits and underscores only.
pub fn validate_username_format(username: &str) -> Result<(), ValidationError> {
    if USERNAME_REGEX.is_match(username) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_username_format").with_message(Cow::Borrowed(
            "Username can only contain letters, numbers and underscores",
        )))
    }
}

pub fn validate_password_max_length(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() <= MAX_PASSWORD_LENGTH {
        Ok(())
    } else {
        Err(ValidationError::new("password_too_long")
            .with_message(Cow::Borrowed("Password cannot exceed 128 characters")))
    }
}

/// Usernames and emails are unique without regard to case.
pub fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Trim a free-text search term, rejecting empty or oversized input.
pub fn validate_search_input(search: &str) -> Result<String, ValidationError> {
    let search = search.trim();
    if search.is_empty() {
        return Err(ValidationError::new("search_empty"));
    }
    if search.len() > 100 {
        return Err(ValidationError::new("search_too_long"));
    }
    Ok(search.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_validation() {
        let validator = PasswordValidator::with_default_policy();

        assert!(validator.validate("secret9", "user").is_ok());
        assert!(validator.validate("Correct horse 42", "user").is_ok());

        assert_eq!(validator.validate("a1", "user"), Err(PasswordError::TooShort(6)));
        assert_eq!(validator.validate("123456789", "user"), Err(PasswordError::MissingLetter));
        assert_eq!(validator.validate("abcdefgh", "user"), Err(PasswordError::MissingNumber));
        assert_eq!(validator.validate("Password1", "user"), Err(PasswordError::CommonPassword));
        assert!(validator.validate(&"a1".repeat(65), "user").is_err());
    }

    #[test]
    fn test_username_in_password() {
        let validator = PasswordValidator::new(PasswordPolicy {
            disallow_username_in_password: true,
            ..Default::default()
        });
        assert_eq!(
            validator.validate("alice2024", "Alice"),
            Err(PasswordError::ContainsUsername)
        );
        assert!(validator.validate("bob2024x", "alice").is_ok());
    }

    #[test]
    fn test_username_format() {
        let longest = "a".repeat(30);
        let too_long = "a".repeat(31);
        for ok in ["abc", "john_doe", "User123", longest.as_str()] {
            assert!(validate_username_format(ok).is_ok(), "{:?} should pass", ok);
        }
        for bad in ["ab", "user name", "user-name", "user@name", "用户名", "", too_long.as_str()] {
            assert!(validate_username_format(bad).is_err(), "{:?} should fail", bad);
        }
    }

    #[test]
    fn test_search_input() {
        assert_eq!(validate_search_input("  ali ").unwrap(), "ali");
        assert!(validate_search_input("   ").is_err());
        assert!(validate_search_input(&"x".repeat(101)).is_err());
    }
}
