//! # Auth-Core - Session tokens and access policy for postgate
//!
//! This crate holds the authentication and authorization contract shared by
//! every postgate service:
//! - [`TokenService`]: issues and verifies signed bearer tokens
//! - [`Role`] / [`has_role`]: the ordered role hierarchy
//! - [`authorize_role`] / [`authorize_ownership`]: pure allow/deny decisions
//! - [`Authenticator`]: turns an `Authorization` header into a live [`Caller`]
//!
//! ## Request flow
//!
//! An inbound request carries an optional bearer token. The token service
//! verifies it and yields the embedded identity snapshot; the identity store
//! confirms the account still exists and is active; the policy evaluator then
//! decides whether the caller may touch the target resource.
//!
//! Every denial is an [`AuthError`] with a stable status code and message, so
//! transport layers can render it without inspecting internals.

pub mod error;
pub mod role;
pub mod token;
pub mod policy;
pub mod identity;
pub mod http;

pub use error::{AuthError, Result};
pub use role::{has_role, Role, UnknownRole};
pub use token::{extract_bearer, parse_expiry, SessionClaims, TokenConfig, TokenService};
pub use policy::{authorize_ownership, authorize_role, Caller, Decision, Denial, Owned};
pub use identity::{Authenticator, Identity, IdentityStore};
pub use http::{MaybeCaller, RequireCaller};
