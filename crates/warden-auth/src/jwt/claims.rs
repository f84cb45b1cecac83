//! JWT claims carried by session and action tokens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::action::Action;

/// Registered claims plus a typed claim set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (the user UID).
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Not-before timestamp (seconds since epoch).
    pub nbf: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Random key id, reserved for key rotation.
    pub kid: String,
    /// Token-kind specific claims.
    #[serde(flatten)]
    pub set: ClaimSet,
}

/// The payload of a token, tagged by `typ`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "typ", rename_all = "snake_case")]
pub enum ClaimSet {
    /// Stateless session: identity plus a point-in-time admin flag.
    Session { uid: Uuid, name: String, admin: bool },
    /// Single-purpose e-mail workflow token.
    Action { act: Action, uid: Uuid },
}
