//! Locale collaborator used to produce user-facing messages and errors.

use std::fmt;

use crate::error::{AppError, ErrorKind};

/// Looks up localized messages by dotted code, e.g. `auth.errors.user.is-lock`.
pub trait Translator: Send + Sync + fmt::Debug + 'static {
    /// Translate `code` for `lang`, replacing `{name}` placeholders from
    /// `args`. Falls back to the code itself when no message is known.
    fn translate(&self, lang: &str, code: &str, args: &[(&str, &str)]) -> String;

    /// Build an [`AppError`] whose message is the translated `code`.
    fn error(&self, lang: &str, kind: ErrorKind, code: &str, args: &[(&str, &str)]) -> AppError {
        AppError::new(kind, self.translate(lang, code, args))
    }
}
