//! Hand-off of action e-mails to the job dispatcher.

use std::sync::Arc;

use bytes::Bytes;
use tracing::info;

use warden_auth::{Action, ActionTokens};
use warden_core::result::AppResult;
use warden_core::traits::{JobDispatcher, Translator};
use warden_entity::user::User;
use warden_worker::jobs::{EmailMessage, SEND_EMAIL, SEND_EMAIL_PRIORITY};

use crate::context::RequestContext;

/// Mints an action token and enqueues the e-mail carrying it.
#[derive(Debug, Clone)]
pub struct ActionEmails {
    tokens: ActionTokens,
    dispatcher: Arc<dyn JobDispatcher>,
    locales: Arc<dyn Translator>,
}

impl ActionEmails {
    /// Creates the e-mail sender.
    pub fn new(
        tokens: ActionTokens,
        dispatcher: Arc<dyn JobDispatcher>,
        locales: Arc<dyn Translator>,
    ) -> Self {
        Self {
            tokens,
            dispatcher,
            locales,
        }
    }

    /// Builds the `action` e-mail for `user` and enqueues it.
    ///
    /// Subject and body come from `auth.emails.<action>.subject|body` with
    /// the `{home}` and `{token}` placeholders filled in. An enqueue failure
    /// is returned to the caller.
    pub async fn send(&self, ctx: &RequestContext, user: &User, action: Action) -> AppResult<()> {
        let token = self.tokens.mint(user, action)?;
        let args = [("home", ctx.home.as_str()), ("token", token.as_str())];

        let message = EmailMessage {
            to: user.email.clone(),
            subject: self.locales.translate(
                &ctx.lang,
                &format!("auth.emails.{action}.subject"),
                &args,
            ),
            body: self
                .locales
                .translate(&ctx.lang, &format!("auth.emails.{action}.body"), &args),
        };
        let body = serde_json::to_vec(&message)?;

        self.dispatcher
            .send(SEND_EMAIL_PRIORITY, SEND_EMAIL, Bytes::from(body))
            .await?;

        info!(user_id = %user.id, action = %action, "Action e-mail queued");
        Ok(())
    }

    /// Redeems an action token; see [`ActionTokens::redeem`].
    pub async fn redeem(&self, token: &str, expected: Action) -> AppResult<User> {
        self.tokens.redeem(token, expected).await
    }
}
