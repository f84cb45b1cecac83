//! Input forms of the account flows.
//!
//! Field rules are checked with `validator` before any store access; the
//! configured [`PasswordPolicy`](warden_auth::PasswordPolicy) is applied on
//! top for new passwords.

use serde::{Deserialize, Serialize};
use validator::Validate;

use warden_core::error::AppError;
use warden_core::result::AppResult;

/// Registration with e-mail and password.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignUpForm {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 32))]
    pub password: String,
    #[validate(must_match(other = "password"))]
    pub password_confirmation: String,
}

/// E-mail and password sign-in.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignInForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

/// A bare e-mail address, used by the confirm, unlock and forgot-password
/// requests.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EmailForm {
    #[validate(email)]
    pub email: String,
}

/// Password reset with a `reset-password` action token.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordForm {
    #[validate(length(min = 1))]
    pub token: String,
    #[validate(length(min = 6, max = 32))]
    pub password: String,
    #[validate(must_match(other = "password"))]
    pub password_confirmation: String,
}

/// Password change by a signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordForm {
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(length(min = 6, max = 32))]
    pub new_password: String,
    #[validate(must_match(other = "new_password"))]
    pub password_confirmation: String,
}

/// Profile update by a signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InfoForm {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// New avatar URL; the current one is kept when absent.
    #[validate(url)]
    pub logo: Option<String>,
}

/// Runs the derived rules, mapping failures to a validation error.
pub(crate) fn check(form: &impl Validate) -> AppResult<()> {
    form.validate()
        .map_err(|e| AppError::validation(format!("Invalid form: {e}")))
}
