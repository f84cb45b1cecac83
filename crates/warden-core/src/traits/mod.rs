//! Core traits defined in `warden-core` and implemented by other crates.

pub mod clock;
pub mod dispatcher;
pub mod translator;

pub use clock::{Clock, ManualClock, SystemClock};
pub use dispatcher::JobDispatcher;
pub use translator::Translator;
