//! # warden-auth
//!
//! Access control and secure tokens for Warden.
//!
//! ## Modules
//!
//! - `secrets` — process-wide key material loaded once at startup
//! - `password` — keyed password digests and password policy
//! - `crypto` — authenticated symmetric encryption for at-rest secrets
//! - `jwt` — HS512 token signing and verification with typed claims
//! - `action` — single-purpose tokens for confirm / unlock / reset-password
//! - `rbac` — scoped roles and time-bounded grants
//! - `session` — session token issuance and bearer-header resolution

pub mod action;
pub mod crypto;
pub mod jwt;
pub mod password;
pub mod rbac;
pub mod secrets;
pub mod session;

pub use action::{Action, ActionTokens};
pub use crypto::SymmetricCipher;
pub use jwt::{ClaimSet, Claims, JwtDecoder, JwtEncoder};
pub use password::{PasswordDigest, PasswordPolicy};
pub use rbac::Authorizer;
pub use secrets::SecretStore;
pub use session::{CurrentUser, SessionGuard, SessionIssuer};
