//! JWT token verification.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use warden_core::error::AppError;
use warden_core::traits::Clock;

use super::claims::Claims;
use crate::secrets::SecretStore;

/// Verifies HS512 tokens.
///
/// The library checks the signature only; the time window is evaluated
/// against the injected clock with zero leeway, so `now >= exp` is expired
/// and `now < nbf` is not yet valid.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl JwtDecoder {
    /// Creates a decoder keyed by the configured signing key.
    pub fn new(secrets: &SecretStore, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.required_spec_claims = HashSet::new();

        Self {
            decoding_key: DecodingKey::from_secret(secrets.jwt_key()),
            validation,
            clock,
        }
    }

    /// Verifies signature and time window and returns the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!(error = %e, "Token rejected");
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::token_invalid("Invalid token signature")
                    }
                    _ => AppError::token_invalid(format!("Malformed token: {e}")),
                }
            })?
            .claims;

        let now = self.clock.now().timestamp();
        if now >= claims.exp {
            return Err(AppError::token_expired("Token has expired"));
        }
        if now < claims.nbf {
            return Err(AppError::token_invalid("Token is not valid yet"));
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;
    use warden_core::error::ErrorKind;
    use warden_core::traits::ManualClock;

    use crate::jwt::{ClaimSet, JwtEncoder};
    use crate::secrets::generate_config;

    fn pair() -> (JwtEncoder, JwtDecoder, ManualClock) {
        let secrets = SecretStore::from_config(&generate_config()).unwrap();
        let clock = ManualClock::starting_now();
        let shared: Arc<dyn Clock> = Arc::new(clock.clone());
        (
            JwtEncoder::new(&secrets, shared.clone()),
            JwtDecoder::new(&secrets, shared),
            clock,
        )
    }

    fn session() -> ClaimSet {
        ClaimSet::Session {
            uid: Uuid::new_v4(),
            name: "alice".into(),
            admin: false,
        }
    }

    #[test]
    fn test_sign_then_verify() {
        let (encoder, decoder, _) = pair();
        let set = session();
        let token = encoder.sign(set.clone(), "subject", Duration::hours(1)).unwrap();
        let claims = decoder.verify(&token).unwrap();

        assert_eq!(claims.set, set);
        assert_eq!(claims.sub, "subject");
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(claims.nbf, claims.iat);
    }

    #[test]
    fn test_zero_ttl_is_expired_immediately() {
        let (encoder, decoder, _) = pair();
        let token = encoder.sign(session(), "s", Duration::zero()).unwrap();
        let err = decoder.verify(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TokenExpired);
    }

    #[test]
    fn test_sub_second_ttl_rounds_up() {
        let (encoder, decoder, _) = pair();
        let token = encoder.sign(session(), "s", Duration::milliseconds(900)).unwrap();
        let claims = decoder.verify(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 1);
    }

    #[test]
    fn test_negative_ttl_is_rejected() {
        let (encoder, _, _) = pair();
        let err = encoder.sign(session(), "s", Duration::seconds(-1)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_expiry_follows_clock() {
        let (encoder, decoder, clock) = pair();
        let token = encoder.sign(session(), "s", Duration::hours(6)).unwrap();

        clock.advance(Duration::hours(6) - Duration::seconds(1));
        assert!(decoder.verify(&token).is_ok());
        clock.advance(Duration::seconds(1));
        assert!(decoder.verify(&token).unwrap_err().is(ErrorKind::TokenExpired));
    }

    #[test]
    fn test_not_yet_valid() {
        let (encoder, decoder, clock) = pair();
        let token = encoder.sign(session(), "s", Duration::hours(1)).unwrap();
        clock.advance(Duration::seconds(-5));
        assert!(decoder.verify(&token).unwrap_err().is(ErrorKind::TokenInvalid));
    }

    #[test]
    fn test_foreign_key_is_invalid() {
        let (encoder, _, _) = pair();
        let (_, other_decoder, _) = pair();
        let token = encoder.sign(session(), "s", Duration::hours(1)).unwrap();
        let err = other_decoder.verify(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TokenInvalid);
    }

    #[test]
    fn test_garbage_is_invalid() {
        let (_, decoder, _) = pair();
        assert!(decoder.verify("not.a.token").unwrap_err().is(ErrorKind::TokenInvalid));
        assert!(decoder.verify("").unwrap_err().is(ErrorKind::TokenInvalid));
    }
}
