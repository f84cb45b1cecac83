//! Session token issuance and bearer-header resolution.

pub mod guard;
pub mod issuer;

pub use guard::{CurrentUser, SessionGuard};
pub use issuer::SessionIssuer;
