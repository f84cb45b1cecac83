//! Password policy enforcement for new passwords.

use zxcvbn::Score;

use warden_core::config::AuthConfig;
use warden_core::error::AppError;

/// Validates new passwords against the configured length bounds and an
/// optional zxcvbn strength floor.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    min_length: usize,
    max_length: usize,
    min_score: Option<Score>,
}

impl PasswordPolicy {
    /// Creates a policy from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            max_length: config.password_max_length,
            min_score: required_score(config.password_min_strength),
        }
    }

    /// Returns the first violated rule as a validation error.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        let len = password.chars().count();
        if len < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }
        if len > self.max_length {
            return Err(AppError::validation(format!(
                "Password must be at most {} characters long",
                self.max_length
            )));
        }

        if let Some(min_score) = self.min_score {
            let estimate = zxcvbn::zxcvbn(password, &[]);
            if estimate.score() < min_score {
                return Err(AppError::validation(
                    "Password is too weak. Please use a stronger password with more entropy.",
                ));
            }
        }

        Ok(())
    }
}

fn required_score(level: u8) -> Option<Score> {
    match level {
        0 => None,
        1 => Some(Score::One),
        2 => Some(Score::Two),
        3 => Some(Score::Three),
        _ => Some(Score::Four),
    }
}
