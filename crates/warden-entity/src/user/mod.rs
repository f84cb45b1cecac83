//! User domain entities.

pub mod log;
pub mod model;

pub use log::{CreateUserLog, UserLog};
pub use model::{CreateUser, PROVIDER_EMAIL, User, UserChange, gravatar_url};
