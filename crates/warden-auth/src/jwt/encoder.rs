//! JWT token creation.

use std::fmt;
use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use uuid::Uuid;

use warden_core::error::AppError;
use warden_core::traits::Clock;

use super::claims::{ClaimSet, Claims};
use crate::secrets::SecretStore;

/// Signs compact HS512 tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl JwtEncoder {
    /// Creates an encoder keyed by the configured signing key.
    pub fn new(secrets: &SecretStore, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secrets.jwt_key()),
            clock,
        }
    }

    /// Signs `set` for `subject`, valid from now until now + `ttl`.
    ///
    /// Claims carry whole seconds, so a fractional `ttl` is rounded up. A
    /// negative `ttl` is a validation error. A fresh random key id is
    /// stamped into both the header and the claims.
    pub fn sign(&self, set: ClaimSet, subject: &str, ttl: Duration) -> Result<String, AppError> {
        if ttl < Duration::zero() {
            return Err(AppError::validation("Token lifetime must not be negative"));
        }
        let mut ttl_secs = ttl.num_seconds();
        if ttl > Duration::seconds(ttl_secs) {
            ttl_secs += 1;
        }

        let now = self.clock.now().timestamp();
        let kid = Uuid::new_v4().to_string();

        let claims = Claims {
            sub: subject.to_string(),
            iat: now,
            nbf: now,
            exp: now.saturating_add(ttl_secs),
            kid: kid.clone(),
            set,
        };

        let mut header = Header::new(Algorithm::HS512);
        header.kid = Some(kid);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }
}
