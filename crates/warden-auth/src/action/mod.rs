//! Single-purpose tokens for e-mail workflows.

pub mod kind;
pub mod tokens;

pub use kind::Action;
pub use tokens::ActionTokens;
