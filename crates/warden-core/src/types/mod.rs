//! Shared domain types.

pub mod id;
pub mod scope;

pub use id::{PolicyId, RoleId, UserId};
pub use scope::ResourceScope;
