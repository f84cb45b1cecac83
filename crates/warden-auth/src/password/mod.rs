//! Keyed password digests and password policy enforcement.

pub mod digest;
pub mod policy;

pub use digest::PasswordDigest;
pub use policy::PasswordPolicy;
