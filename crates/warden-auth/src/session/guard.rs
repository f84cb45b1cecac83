//! Resolution of the signed-in user from an `Authorization` header.

use std::sync::Arc;

use tracing::debug;

use warden_core::error::{AppError, ErrorKind};
use warden_core::result::AppResult;
use warden_database::store::UserStore;
use warden_entity::rbac::ROLE_ADMIN;
use warden_entity::user::User;

use crate::jwt::{ClaimSet, Claims, JwtDecoder};
use crate::rbac::Authorizer;

/// Scheme prefix of the `Authorization` header.
const BEARER_PREFIX: &str = "Bearer ";

/// The user behind a valid session token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub claims: Claims,
    /// Live check of the global admin role, evaluated at resolution time.
    pub is_admin: bool,
}

/// Gates "must be signed in" and "must be admin".
#[derive(Debug, Clone)]
pub struct SessionGuard {
    decoder: JwtDecoder,
    users: Arc<dyn UserStore>,
    authorizer: Authorizer,
}

impl SessionGuard {
    /// Creates a guard.
    pub fn new(decoder: JwtDecoder, users: Arc<dyn UserStore>, authorizer: Authorizer) -> Self {
        Self {
            decoder,
            users,
            authorizer,
        }
    }

    /// Resolves the user from an `Authorization: Bearer <token>` value.
    ///
    /// Missing headers, bad or expired tokens and unknown users are
    /// `Unauthorized`; so are unconfirmed and locked accounts.
    pub async fn current_user(&self, authorization: Option<&str>) -> AppResult<CurrentUser> {
        let token = authorization
            .and_then(|h| h.strip_prefix(BEARER_PREFIX))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::unauthorized("Missing bearer token"))?;

        let claims = self.decoder.verify(token).map_err(|e| {
            debug!(error = %e, "Session token rejected");
            let message = if e.is(ErrorKind::TokenExpired) {
                "Session has expired"
            } else {
                "Invalid session token"
            };
            AppError::unauthorized(message)
        })?;

        let ClaimSet::Session { uid, .. } = &claims.set else {
            return Err(AppError::unauthorized("Not a session token"));
        };

        let user = self
            .users
            .find_by_uid(*uid)
            .await?
            .ok_or_else(|| AppError::unauthorized("Unknown user"))?;

        if !user.is_confirmed() {
            return Err(AppError::unauthorized("Account is not confirmed"));
        }
        if user.is_locked() {
            return Err(AppError::unauthorized("Account is locked"));
        }

        let is_admin = self.authorizer.is(user.id, &[ROLE_ADMIN]).await?;
        Ok(CurrentUser {
            user,
            claims,
            is_admin,
        })
    }

    /// Like [`current_user`](Self::current_user), but the user must hold the
    /// global admin role right now.
    pub async fn require_admin(&self, authorization: Option<&str>) -> AppResult<CurrentUser> {
        let current = self.current_user(authorization).await?;
        if !current.is_admin {
            return Err(AppError::forbidden("Administrator role is required"));
        }
        Ok(current)
    }
}
