//! Key/value settings.

pub mod model;

pub use model::Setting;
