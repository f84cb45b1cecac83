//! Background job processing for Warden.
//!
//! This crate provides:
//! - An in-process priority queue implementing the job dispatcher contract
//! - A job executor that dispatches messages to registered handlers
//! - A worker runner that consumes the queue with at-least-once delivery
//! - The `send-email` job handler and mail transports

pub mod executor;
pub mod jobs;
pub mod queue;
pub mod runner;

pub use executor::{JobExecutionError, JobExecutor, JobHandler};
pub use queue::{MemoryQueue, QueueStats, QueuedJob};
pub use runner::{Settlement, WorkerRunner};
