//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use warden_core::types::UserId;

/// Provider type of accounts registered with e-mail and password.
pub const PROVIDER_EMAIL: &str = "email";

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Internal identifier. Never embedded in tokens.
    pub id: UserId,
    /// Opaque public identifier carried in tokens.
    pub uid: Uuid,
    /// Display name.
    pub name: String,
    /// E-mail address.
    pub email: String,
    /// Keyed password digest. Never leaves the process.
    #[serde(skip)]
    pub password: Vec<u8>,
    /// Identity provider (`"email"` for local accounts).
    pub provider_type: String,
    /// Identifier at the provider (the e-mail for local accounts).
    pub provider_id: String,
    /// Avatar URL.
    pub logo: String,
    /// Profile path.
    pub home: String,
    pub sign_in_count: i64,
    pub current_sign_in_at: Option<DateTime<Utc>>,
    pub current_sign_in_ip: String,
    pub last_sign_in_at: Option<DateTime<Utc>>,
    pub last_sign_in_ip: String,
    /// When the e-mail address was confirmed.
    pub confirmed_at: Option<DateTime<Utc>>,
    /// When the account was locked.
    pub locked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether the e-mail address has been confirmed.
    pub fn is_confirmed(&self) -> bool {
        self.confirmed_at.is_some()
    }

    /// Whether the account is locked.
    pub fn is_locked(&self) -> bool {
        self.locked_at.is_some()
    }

    /// Applies `change` to this in-memory copy, stamping `updated_at`.
    pub fn apply(&mut self, change: &UserChange, now: DateTime<Utc>) {
        match change {
            UserChange::Password(digest) => self.password = digest.clone(),
            UserChange::Confirmed(at) => self.confirmed_at = *at,
            UserChange::Locked(at) => self.locked_at = *at,
            UserChange::Profile { name, logo } => {
                self.name = name.clone();
                self.logo = logo.clone();
            }
            UserChange::SignIn { ip, at } => {
                self.sign_in_count += 1;
                self.last_sign_in_at = self.current_sign_in_at;
                self.last_sign_in_ip = std::mem::take(&mut self.current_sign_in_ip);
                self.current_sign_in_at = Some(*at);
                self.current_sign_in_ip = ip.clone();
            }
        }
        self.updated_at = now;
    }
}

/// Gravatar URL for an e-mail address.
///
/// Gravatar hashes the trimmed, lower-cased address. The digest is supplied
/// by the caller so this crate stays free of hashing dependencies.
pub fn gravatar_url(email_hash_hex: &str) -> String {
    format!("https://www.gravatar.com/avatar/{email_hash_hex}.png")
}

/// Data required to create a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub uid: Uuid,
    pub name: String,
    pub email: String,
    /// Pre-computed password digest.
    pub password: Vec<u8>,
    pub provider_type: String,
    pub provider_id: String,
    pub logo: String,
    pub home: String,
}

/// A single mutation of a stored user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserChange {
    /// Replace the password digest.
    Password(Vec<u8>),
    /// Set or clear the confirmation timestamp.
    Confirmed(Option<DateTime<Utc>>),
    /// Set or clear the lock timestamp.
    Locked(Option<DateTime<Utc>>),
    /// Replace the display name and avatar.
    Profile { name: String, logo: String },
    /// Record a successful sign-in from `ip` at `at`, rotating the current
    /// sign-in timestamp and address into the "last" pair.
    SignIn { ip: String, at: DateTime<Utc> },
}
