//! Configuration for users-core
//!
//! Values are layered: built-in defaults, then an optional config file, then
//! `POSTGATE_*` environment variables (`__` separates nested keys, e.g.
//! `POSTGATE_TOKEN__SECRET`). `JWT_SECRET` and `JWT_EXPIRE` are honoured last
//! for deployments that already set them.

use config::{Config, Environment, File};
use postgate_auth_core::TokenConfig;
use serde::Deserialize;

use crate::{Error, Result};

/// Main configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UsersConfig {
    #[serde(default)]
    pub token: TokenConfig,
    #[serde(default)]
    pub password: PasswordConfig,
    #[serde(default = "default_bind_address")]
    pub api_bind_address: String,
}

/// Password configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PasswordConfig {
    pub min_length: usize,
    pub require_letter: bool,
    pub require_number: bool,
    pub disallow_username_in_password: bool,
    pub argon2_memory_cost: u32,
    pub argon2_time_cost: u32,
    pub argon2_parallelism: u32,
}

fn default_bind_address() -> String {
    "127.0.0.1:5000".to_string()
}

impl UsersConfig {
    /// Load configuration from an optional file plus the environment.
    ///
    /// A missing signing secret is not an error here; it surfaces when the
    /// token service is built.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder
            .add_source(
                Environment::with_prefix("POSTGATE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option("token.secret", std::env::var("JWT_SECRET").ok())?
            .set_override_option("token.expires_in", std::env::var("JWT_EXPIRE").ok())?;

        let config: UsersConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.password.min_length == 0 {
            return Err(Error::Config("password.min_length must be positive".to_string()));
        }
        if self.api_bind_address.trim().is_empty() {
            return Err(Error::Config("api_bind_address must not be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for UsersConfig {
    fn default() -> Self {
        Self {
            token: TokenConfig::default(),
            password: PasswordConfig::default(),
            api_bind_address: default_bind_address(),
        }
    }
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            min_length: 6,
            require_letter: true,
            require_number: true,
            disallow_username_in_password: false,
            argon2_memory_cost: 19456,
            argon2_time_cost: 2,
            argon2_parallelism: 1,
        }
    }
}
