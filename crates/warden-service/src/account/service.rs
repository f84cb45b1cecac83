//! E-mail/password account flows.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use uuid::Uuid;

use warden_auth::{Action, CurrentUser, PasswordDigest, PasswordPolicy, SessionIssuer};
use warden_core::error::{AppError, ErrorKind};
use warden_core::result::AppResult;
use warden_core::traits::{Clock, Translator};
use warden_database::store::UserStore;
use warden_entity::user::{
    CreateUser, CreateUserLog, PROVIDER_EMAIL, User, UserChange, UserLog, gravatar_url,
};

use super::email::ActionEmails;
use super::forms::{
    ChangePasswordForm, EmailForm, InfoForm, ResetPasswordForm, SignInForm, SignUpForm, check,
};
use crate::context::RequestContext;

/// Number of activity log entries returned by [`AccountService::logs`].
pub const LOG_PAGE_SIZE: i64 = 120;

/// Result of a successful sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInResult {
    /// Session token to present as `Authorization: Bearer <token>`.
    pub token: String,
    /// The signed-in user with rotated sign-in counters.
    pub user: User,
}

/// Sign-up, sign-in and the e-mail driven account flows.
///
/// Every state change appends a localized line to the user's activity log.
#[derive(Debug, Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
    digest: PasswordDigest,
    policy: PasswordPolicy,
    sessions: SessionIssuer,
    emails: ActionEmails,
    locales: Arc<dyn Translator>,
    clock: Arc<dyn Clock>,
}

impl AccountService {
    /// Creates the account service.
    pub fn new(
        users: Arc<dyn UserStore>,
        digest: PasswordDigest,
        policy: PasswordPolicy,
        sessions: SessionIssuer,
        emails: ActionEmails,
        locales: Arc<dyn Translator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            digest,
            policy,
            sessions,
            emails,
            locales,
            clock,
        }
    }

    /// Registers an e-mail/password account and sends the confirm e-mail.
    pub async fn sign_up(&self, ctx: &RequestContext, form: SignUpForm) -> AppResult<User> {
        check(&form)?;
        self.policy.validate(&form.password)?;

        if self.users.find_by_email(&form.email).await?.is_some() {
            return Err(self.error(
                ctx,
                ErrorKind::Conflict,
                "auth.errors.user.email-already-exists",
            ));
        }

        let uid = Uuid::new_v4();
        let user = self
            .users
            .create(CreateUser {
                uid,
                name: form.name,
                email: form.email.clone(),
                password: self.digest.sum(form.password.as_bytes())?,
                provider_type: PROVIDER_EMAIL.to_string(),
                provider_id: form.email.clone(),
                logo: gravatar_url(&email_hash(&form.email)),
                home: format!("/users/{uid}"),
            })
            .await?;

        info!(user_id = %user.id, uid = %user.uid, "User signed up");
        self.log(ctx, &user, "auth.logs.user.sign-up").await?;
        self.emails.send(ctx, &user, Action::Confirm).await?;

        Ok(user)
    }

    /// Checks credentials and account state, records the sign-in and mints
    /// a session token.
    ///
    /// Unknown e-mails and wrong passwords both fail with
    /// `InvalidCredentials`; a failed attempt on a known account is logged.
    /// Unconfirmed and locked accounts are `Unauthorized`.
    pub async fn sign_in(&self, ctx: &RequestContext, form: SignInForm) -> AppResult<SignInResult> {
        check(&form)?;

        let Some(user) = self.users.find_by_email(&form.email).await? else {
            return Err(self.bad_credentials(ctx));
        };

        if !self.digest.verify(form.password.as_bytes(), &user.password) {
            warn!(user_id = %user.id, ip = %ctx.ip, "Sign-in failed: password mismatch");
            self.log(ctx, &user, "auth.logs.user.sign-in.failed").await?;
            return Err(self.bad_credentials(ctx));
        }

        if !user.is_confirmed() {
            return Err(self.error(ctx, ErrorKind::Unauthorized, "auth.errors.user.not-confirm"));
        }
        if user.is_locked() {
            return Err(self.error(ctx, ErrorKind::Unauthorized, "auth.errors.user.is-lock"));
        }

        let user = self
            .users
            .update(
                user.id,
                UserChange::SignIn {
                    ip: ctx.ip.clone(),
                    at: self.clock.now(),
                },
            )
            .await?;
        self.log(ctx, &user, "auth.logs.user.sign-in.success").await?;

        let token = self.sessions.mint(&user).await?;
        info!(user_id = %user.id, sign_in_count = user.sign_in_count, "User signed in");

        Ok(SignInResult { token, user })
    }

    /// Records a sign-out. Session tokens are stateless and stay valid
    /// until they expire.
    pub async fn sign_out(&self, ctx: &RequestContext, current: &CurrentUser) -> AppResult<()> {
        self.log(ctx, &current.user, "auth.logs.user.sign-out").await?;
        info!(user_id = %current.user.id, "User signed out");
        Ok(())
    }

    /// Re-sends the confirm e-mail.
    pub async fn confirm_request(&self, ctx: &RequestContext, form: EmailForm) -> AppResult<()> {
        let user = self.by_email(ctx, &form).await?;
        if user.is_confirmed() {
            return Err(self.error(
                ctx,
                ErrorKind::AlreadyInState,
                "auth.errors.user.already-confirm",
            ));
        }
        self.emails.send(ctx, &user, Action::Confirm).await
    }

    /// Redeems a `confirm` token and marks the account confirmed.
    pub async fn confirm(&self, ctx: &RequestContext, token: &str) -> AppResult<User> {
        let user = self.emails.redeem(token, Action::Confirm).await?;
        if user.is_confirmed() {
            return Err(self.error(
                ctx,
                ErrorKind::AlreadyInState,
                "auth.errors.user.already-confirm",
            ));
        }

        let user = self
            .users
            .update(user.id, UserChange::Confirmed(Some(self.clock.now())))
            .await?;
        self.log(ctx, &user, "auth.logs.user.confirm").await?;
        info!(user_id = %user.id, "User confirmed");
        Ok(user)
    }

    /// Sends the unlock e-mail to a locked account.
    pub async fn unlock_request(&self, ctx: &RequestContext, form: EmailForm) -> AppResult<()> {
        let user = self.by_email(ctx, &form).await?;
        if !user.is_locked() {
            return Err(self.error(ctx, ErrorKind::AlreadyInState, "auth.errors.user.not-lock"));
        }
        self.emails.send(ctx, &user, Action::Unlock).await
    }

    /// Redeems an `unlock` token and clears the lock.
    pub async fn unlock(&self, ctx: &RequestContext, token: &str) -> AppResult<User> {
        let user = self.emails.redeem(token, Action::Unlock).await?;
        if !user.is_locked() {
            return Err(self.error(ctx, ErrorKind::AlreadyInState, "auth.errors.user.not-lock"));
        }

        let user = self.users.update(user.id, UserChange::Locked(None)).await?;
        self.log(ctx, &user, "auth.logs.user.unlock").await?;
        info!(user_id = %user.id, "User unlocked");
        Ok(user)
    }

    /// Locks an account. Operator action; the user recovers through the
    /// unlock e-mail.
    pub async fn lock(&self, ctx: &RequestContext, uid: Uuid) -> AppResult<User> {
        let user = self
            .users
            .find_by_uid(uid)
            .await?
            .ok_or_else(|| self.error(ctx, ErrorKind::NotFound, "auth.errors.user.not-exists"))?;
        if user.is_locked() {
            return Err(self.error(
                ctx,
                ErrorKind::AlreadyInState,
                "auth.errors.user.already-lock",
            ));
        }

        let user = self
            .users
            .update(user.id, UserChange::Locked(Some(self.clock.now())))
            .await?;
        self.log(ctx, &user, "auth.logs.user.lock").await?;
        warn!(user_id = %user.id, "User locked");
        Ok(user)
    }

    /// Sends the reset-password e-mail.
    pub async fn forgot_password(&self, ctx: &RequestContext, form: EmailForm) -> AppResult<()> {
        let user = self.by_email(ctx, &form).await?;
        self.emails.send(ctx, &user, Action::ResetPassword).await
    }

    /// Redeems a `reset-password` token and stores the new password.
    ///
    /// The token is not consumed: it can be replayed until it expires.
    pub async fn reset_password(
        &self,
        ctx: &RequestContext,
        form: ResetPasswordForm,
    ) -> AppResult<User> {
        check(&form)?;
        self.policy.validate(&form.password)?;

        let user = self.emails.redeem(&form.token, Action::ResetPassword).await?;
        let user = self
            .users
            .update(
                user.id,
                UserChange::Password(self.digest.sum(form.password.as_bytes())?),
            )
            .await?;
        self.log(ctx, &user, "auth.logs.user.reset-password").await?;
        info!(user_id = %user.id, "Password reset");
        Ok(user)
    }

    /// Changes the password after verifying the current one.
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        current: &CurrentUser,
        form: ChangePasswordForm,
    ) -> AppResult<()> {
        check(&form)?;

        if !self
            .digest
            .verify(form.current_password.as_bytes(), &current.user.password)
        {
            return Err(self.error(ctx, ErrorKind::InvalidCredentials, "auth.errors.bad-password"));
        }
        self.policy.validate(&form.new_password)?;

        let user = self
            .users
            .update(
                current.user.id,
                UserChange::Password(self.digest.sum(form.new_password.as_bytes())?),
            )
            .await?;
        self.log(ctx, &user, "auth.logs.user.change-password").await?;
        info!(user_id = %user.id, "Password changed");
        Ok(())
    }

    /// Updates the display name and, when given, the avatar.
    pub async fn update_info(
        &self,
        ctx: &RequestContext,
        current: &CurrentUser,
        form: InfoForm,
    ) -> AppResult<User> {
        check(&form)?;

        let logo = form.logo.unwrap_or_else(|| current.user.logo.clone());
        let user = self
            .users
            .update(
                current.user.id,
                UserChange::Profile {
                    name: form.name,
                    logo,
                },
            )
            .await?;
        self.log(ctx, &user, "auth.logs.user.update-info").await?;
        info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }

    /// The latest activity log entries of the signed-in user, newest first.
    pub async fn logs(&self, current: &CurrentUser) -> AppResult<Vec<UserLog>> {
        self.users.list_logs(current.user.id, LOG_PAGE_SIZE).await
    }

    /// All accounts, oldest first.
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.users.list().await
    }

    async fn by_email(&self, ctx: &RequestContext, form: &EmailForm) -> AppResult<User> {
        check(form)?;
        self.users
            .find_by_email(&form.email)
            .await?
            .ok_or_else(|| self.error(ctx, ErrorKind::NotFound, "auth.errors.user.not-exists"))
    }

    async fn log(&self, ctx: &RequestContext, user: &User, code: &str) -> AppResult<()> {
        self.users
            .add_log(CreateUserLog {
                user_id: user.id,
                ip: ctx.ip.clone(),
                message: self.locales.translate(&ctx.lang, code, &[]),
            })
            .await?;
        Ok(())
    }

    fn bad_credentials(&self, ctx: &RequestContext) -> AppError {
        self.error(
            ctx,
            ErrorKind::InvalidCredentials,
            "auth.errors.user.email-password-not-match",
        )
    }

    fn error(&self, ctx: &RequestContext, kind: ErrorKind, code: &str) -> AppError {
        self.locales.error(&ctx.lang, kind, code, &[])
    }
}

/// Lower-case hex SHA-256 of the trimmed, lower-cased address, as accepted
/// by Gravatar.
fn email_hash(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    format!("{:x}", Sha256::digest(normalized.as_bytes()))
}
