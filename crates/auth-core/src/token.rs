//! Session token issuance and verification

use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{AuthError, Identity, Result, Role};

const DEFAULT_EXPIRES_IN: &str = "7d";
const DEFAULT_ALGORITHM: &str = "HS256";

/// Claims carried by a session token.
///
/// The identity fields are a snapshot taken at issuance; they are not
/// refreshed if the account changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub iat: u64,
    pub exp: u64,
}

/// Token configuration
#[derive(Clone, Deserialize)]
pub struct TokenConfig {
    /// Symmetric signing secret. Required; there is no built-in fallback.
    #[serde(default)]
    pub secret: Option<String>,
    /// Validity window, e.g. `"7d"`, `"12h"`, `"30m"`, `"45s"` or plain seconds.
    #[serde(default = "default_expires_in")]
    pub expires_in: String,
    /// One of `HS256`, `HS384`, `HS512`.
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

fn default_expires_in() -> String {
    DEFAULT_EXPIRES_IN.to_string()
}

fn default_algorithm() -> String {
    DEFAULT_ALGORITHM.to_string()
}

impl TokenConfig {
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
            ..Default::default()
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: None,
            expires_in: default_expires_in(),
            algorithm: default_algorithm(),
        }
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("expires_in", &self.expires_in)
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

/// Parse an expiry string such as `"7d"` or `"3600"` into a duration.
pub fn parse_expiry(value: &str) -> Result<Duration> {
    let value = value.trim();
    let invalid = || AuthError::Config(format!("Invalid token expiry: {:?}", value));

    let (digits, unit) = match value.char_indices().last() {
        Some((idx, c)) if c.is_ascii_alphabetic() => (&value[..idx], Some(c)),
        Some(_) => (value, None),
        None => return Err(invalid()),
    };

    let amount: i64 = digits.parse().map_err(|_| invalid())?;
    if amount <= 0 {
        return Err(invalid());
    }

    let duration = match unit {
        None | Some('s') => Duration::try_seconds(amount),
        Some('m') => Duration::try_minutes(amount),
        Some('h') => Duration::try_hours(amount),
        Some('d') => Duration::try_days(amount),
        Some(_) => None,
    };
    duration.ok_or_else(invalid)
}

/// Issues and verifies signed session tokens.
///
/// Stateless: nothing is recorded at issuance, so a token stays valid until
/// it expires. Build once at startup and share behind an `Arc`.
#[derive(Clone)]
pub struct TokenService {
    ttl: Duration,
    header: Header,
    validation: Validation,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(config: TokenConfig) -> Result<Self> {
        let secret = config
            .secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AuthError::Config("Token signing secret is not set".to_string()))?;

        let algorithm = match config.algorithm.as_str() {
            "HS256" => Algorithm::HS256,
            "HS384" => Algorithm::HS384,
            "HS512" => Algorithm::HS512,
            other => {
                return Err(AuthError::Config(format!("Unsupported algorithm: {}", other)))
            }
        };

        let ttl = parse_expiry(&config.expires_in)?;
        if Utc::now().checked_add_signed(ttl).is_none() {
            return Err(AuthError::Config(format!(
                "Token expiry out of range: {:?}",
                config.expires_in
            )));
        }

        // Pin the algorithm and drop the default leeway so expiry is exact.
        let mut validation = Validation::new(algorithm);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "iat"]);

        Ok(Self {
            ttl,
            header: Header::new(algorithm),
            validation,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        })
    }

    /// Validity window applied to newly issued tokens.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign a token for `identity`.
    pub fn issue(&self, identity: &Identity) -> Result<String> {
        if identity.id.is_empty() {
            return Err(AuthError::InvalidIdentity("id"));
        }
        if identity.username.is_empty() {
            return Err(AuthError::InvalidIdentity("username"));
        }
        if identity.email.is_empty() {
            return Err(AuthError::InvalidIdentity("email"));
        }

        let now = Utc::now();
        let exp = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::Internal("Token expiry overflows the clock".to_string()))?;

        let claims = SessionClaims {
            id: identity.id.clone(),
            username: identity.username.clone(),
            email: identity.email.clone(),
            role: identity.role,
            iat: now.timestamp() as u64,
            exp: exp.timestamp() as u64,
        };

        encode(&self.header, &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Check signature, structure and expiry in one step.
    ///
    /// All failures collapse to [`AuthError::InvalidToken`]; the specific
    /// reason only goes to the debug log.
    pub fn verify(&self, token: &str) -> Result<SessionClaims> {
        match decode::<SessionClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => {
                debug!(reason = ?e.kind(), "Rejected session token");
                Err(AuthError::InvalidToken)
            }
        }
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header value.
///
/// The scheme is case-sensitive and must be followed by exactly one space and
/// a non-empty token with no further whitespace.
pub fn extract_bearer(header: Option<&str>) -> Option<&str> {
    let token = header?.strip_prefix("Bearer ")?;
    if token.is_empty() || token.chars().any(char::is_whitespace) {
        return None;
    }
    Some(token)
}
