//! Translations loaded from locale files.

pub mod locales;

pub use locales::Locales;
