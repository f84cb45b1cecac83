//! Site settings with optional at-rest encryption.

pub mod service;

pub use service::SettingService;
