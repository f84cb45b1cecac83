//! Action tags bound into action tokens.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use warden_core::error::AppError;

/// The workflow an action token authorizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// Confirm the e-mail address of a new account.
    Confirm,
    /// Unlock a locked account.
    Unlock,
    /// Replace a forgotten password.
    ResetPassword,
}

impl Action {
    /// Wire name of the action.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Confirm => "confirm",
            Self::Unlock => "unlock",
            Self::ResetPassword => "reset-password",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirm" => Ok(Self::Confirm),
            "unlock" => Ok(Self::Unlock),
            "reset-password" => Ok(Self::ResetPassword),
            other => Err(AppError::validation(format!("Unknown action '{other}'"))),
        }
    }
}
