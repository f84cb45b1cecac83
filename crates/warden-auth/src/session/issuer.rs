//! Session token issuance.

use chrono::Duration;
use tracing::info;

use warden_core::config::AuthConfig;
use warden_core::result::AppResult;
use warden_entity::rbac::ROLE_ADMIN;
use warden_entity::user::User;

use crate::jwt::{ClaimSet, JwtEncoder};
use crate::rbac::Authorizer;

/// Mints stateless session tokens.
///
/// The embedded `admin` flag is a snapshot taken at issuance; callers that
/// need a live answer ask the [`Authorizer`].
#[derive(Debug, Clone)]
pub struct SessionIssuer {
    encoder: JwtEncoder,
    authorizer: Authorizer,
    ttl: Duration,
}

impl SessionIssuer {
    /// Creates an issuer using `auth.session_ttl_hours` as the lifetime.
    pub fn new(encoder: JwtEncoder, authorizer: Authorizer, config: &AuthConfig) -> Self {
        Self {
            encoder,
            authorizer,
            ttl: config.session_ttl(),
        }
    }

    /// Mints a session token for `user`.
    pub async fn mint(&self, user: &User) -> AppResult<String> {
        let admin = self.authorizer.is(user.id, &[ROLE_ADMIN]).await?;
        let token = self.encoder.sign(
            ClaimSet::Session {
                uid: user.uid,
                name: user.name.clone(),
                admin,
            },
            &user.uid.to_string(),
            self.ttl,
        )?;
        info!(user_id = %user.id, admin = admin, "Session token issued");
        Ok(token)
    }
}
