//! Password hashing
//!
//! Hashing is an explicit step run by the service before a user is stored;
//! stores only ever see the encoded hash.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::config::PasswordConfig;
use crate::{Error, Result};

/// Argon2id hasher configured from [`PasswordConfig`].
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new(config: &PasswordConfig) -> Result<Self> {
        let params = Params::new(
            config.argon2_memory_cost,
            config.argon2_time_cost,
            config.argon2_parallelism,
            None,
        )
        .map_err(|e| Error::Config(format!("Invalid argon2 parameters: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Produce a PHC-encoded hash with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| Error::PasswordHash(e.to_string()))
    }

    /// False for a wrong password and for a hash that cannot be parsed.
    pub fn verify(&self, password: &str, encoded: &str) -> bool {
        match PasswordHash::new(encoded) {
            Ok(parsed) => self.argon2.verify_password(password.as_bytes(), &parsed).is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::new(&PasswordConfig {
            argon2_memory_cost: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = fast_hasher();
        let hash = hasher.hash("secret9").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("secret9", &hash));
        assert!(!hasher.verify("secret8", &hash));
    }

    #[test]
    fn test_salts_differ() {
        let hasher = fast_hasher();
        assert_ne!(hasher.hash("secret9").unwrap(), hasher.hash("secret9").unwrap());
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        assert!(!fast_hasher().verify("anything", "not-a-phc-string"));
    }

    #[test]
    fn test_invalid_params() {
        let config = PasswordConfig {
            argon2_time_cost: 0,
            ..Default::default()
        };
        assert!(matches!(PasswordHasher::new(&config), Err(Error::Config(_))));
    }
}
