//! Role-based authorization with scoped roles and time-bounded grants.

pub mod engine;

pub use engine::{Authorizer, grant_window};
