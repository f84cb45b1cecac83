//! Account flows: sign-up, sign-in and the e-mail driven confirm, unlock
//! and password reset round trips.

pub mod email;
pub mod forms;
pub mod service;

pub use email::ActionEmails;
pub use forms::{
    ChangePasswordForm, EmailForm, InfoForm, ResetPasswordForm, SignInForm, SignUpForm,
};
pub use service::{AccountService, LOG_PAGE_SIZE, SignInResult};
