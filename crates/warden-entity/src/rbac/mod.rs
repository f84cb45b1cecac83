//! Role and policy (grant) entities.

pub mod policy;
pub mod role;

pub use policy::Policy;
pub use role::{ROLE_ADMIN, ROLE_ROOT, Role};
