//! Minting and redeeming action tokens.

use std::sync::Arc;

use chrono::Duration;
use tracing::{info, warn};

use warden_core::config::AuthConfig;
use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_database::store::UserStore;
use warden_entity::user::User;

use super::kind::Action;
use crate::jwt::{ClaimSet, JwtDecoder, JwtEncoder};

/// Issues and redeems tokens that bind one action to one user.
///
/// Tokens are not persisted. Redemption validates signature, expiry and the
/// action tag; replay protection is the caller's concern.
#[derive(Debug, Clone)]
pub struct ActionTokens {
    encoder: JwtEncoder,
    decoder: JwtDecoder,
    users: Arc<dyn UserStore>,
    ttl: Duration,
}

impl ActionTokens {
    /// Creates the token service. The default lifetime comes from
    /// `auth.action_ttl_hours`.
    pub fn new(
        encoder: JwtEncoder,
        decoder: JwtDecoder,
        users: Arc<dyn UserStore>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            encoder,
            decoder,
            users,
            ttl: config.action_ttl(),
        }
    }

    /// Mints a token for `action` on `user` with the configured lifetime.
    pub fn mint(&self, user: &User, action: Action) -> AppResult<String> {
        self.mint_with_ttl(user, action, self.ttl)
    }

    /// Mints a token for `action` on `user` valid for `ttl`.
    pub fn mint_with_ttl(&self, user: &User, action: Action, ttl: Duration) -> AppResult<String> {
        let token = self.encoder.sign(
            ClaimSet::Action {
                act: action,
                uid: user.uid,
            },
            &user.uid.to_string(),
            ttl,
        )?;
        info!(user_id = %user.id, action = %action, "Action token issued");
        Ok(token)
    }

    /// Verifies `token`, checks it was minted for `expected` and resolves
    /// the user it names.
    pub async fn redeem(&self, token: &str, expected: Action) -> AppResult<User> {
        let claims = self.decoder.verify(token)?;

        let (act, uid) = match claims.set {
            ClaimSet::Action { act, uid } => (act, uid),
            ClaimSet::Session { .. } => {
                return Err(AppError::token_invalid("Not an action token"));
            }
        };

        if act != expected {
            warn!(expected = %expected, actual = %act, "Action token redeemed for wrong action");
            return Err(AppError::action_mismatch(format!(
                "Token was issued for '{act}', expected '{expected}'"
            )));
        }

        self.users
            .find_by_uid(uid)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {uid} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use warden_core::error::ErrorKind;
    use warden_core::traits::{Clock, ManualClock};
    use warden_database::MemoryStore;
    use warden_entity::user::{CreateUser, PROVIDER_EMAIL};

    use crate::secrets::{SecretStore, generate_config};

    struct Fixture {
        tokens: ActionTokens,
        store: MemoryStore,
        clock: ManualClock,
    }

    fn fixture() -> Fixture {
        let secrets = SecretStore::from_config(&generate_config()).unwrap();
        let clock = ManualClock::starting_now();
        let shared: Arc<dyn Clock> = Arc::new(clock.clone());
        let store = MemoryStore::new();
        let tokens = ActionTokens::new(
            JwtEncoder::new(&secrets, shared.clone()),
            JwtDecoder::new(&secrets, shared),
            Arc::new(store.clone()),
            &AuthConfig::default(),
        );
        Fixture {
            tokens,
            store,
            clock,
        }
    }

    async fn user(store: &MemoryStore) -> User {
        store
            .create(CreateUser {
                uid: Uuid::new_v4(),
                name: "bob".into(),
                email: "bob@example.com".into(),
                password: vec![],
                provider_type: PROVIDER_EMAIL.into(),
                provider_id: "bob@example.com".into(),
                logo: String::new(),
                home: "/users".into(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_redeem_returns_user() {
        let f = fixture();
        let user = user(&f.store).await;
        let token = f.tokens.mint(&user, Action::Confirm).unwrap();

        let redeemed = f.tokens.redeem(&token, Action::Confirm).await.unwrap();
        assert_eq!(redeemed.id, user.id);
    }

    #[tokio::test]
    async fn test_wrong_action_is_rejected() {
        let f = fixture();
        let user = user(&f.store).await;
        let token = f.tokens.mint(&user, Action::Confirm).unwrap();

        let err = f.tokens.redeem(&token, Action::ResetPassword).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ActionMismatch);
    }

    #[tokio::test]
    async fn test_default_lifetime_is_six_hours() {
        let f = fixture();
        let user = user(&f.store).await;
        let token = f.tokens.mint(&user, Action::Unlock).unwrap();

        f.clock.advance(Duration::hours(6));
        let err = f.tokens.redeem(&token, Action::Unlock).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::TokenExpired);
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let f = fixture();
        let mut ghost = user(&f.store).await;
        ghost.uid = Uuid::new_v4();
        let token = f.tokens.mint(&ghost, Action::Confirm).unwrap();

        let err = f.tokens.redeem(&token, Action::Confirm).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_action_names() {
        assert_eq!("reset-password".parse::<Action>().unwrap(), Action::ResetPassword);
        assert_eq!(Action::Unlock.to_string(), "unlock");
        assert!("delete".parse::<Action>().is_err());
    }
}
