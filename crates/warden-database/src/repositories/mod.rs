//! PostgreSQL implementations of the store traits.

pub mod policy;
pub mod setting;
pub mod user;

pub use policy::PolicyRepository;
pub use setting::SettingRepository;
pub use user::UserRepository;

use warden_core::error::{AppError, ErrorKind};

/// Map a write error, turning unique violations into `Conflict`.
pub(crate) fn write_error(e: sqlx::Error, context: &str) -> AppError {
    let unique = matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation());
    if unique {
        AppError::conflict(format!("{context}: already exists"))
    } else {
        AppError::with_source(ErrorKind::Database, context.to_string(), e)
    }
}
