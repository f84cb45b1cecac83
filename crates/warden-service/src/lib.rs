//! # warden-service
//!
//! Use-case layer for Warden. Each service orchestrates the stores, the
//! auth primitives, the translator and the job dispatcher to implement the
//! operations an HTTP layer exposes.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references or cheap clones.

pub mod account;
pub mod context;
pub mod i18n;
pub mod setting;

pub use account::{AccountService, ActionEmails, SignInResult};
pub use context::RequestContext;
pub use i18n::Locales;
pub use setting::SettingService;
