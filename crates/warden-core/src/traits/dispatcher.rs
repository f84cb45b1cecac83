//! Job dispatch contract used to hand work (e.g. e-mail delivery) to a
//! background consumer.

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Enqueues opaque job bodies for out-of-band processing.
///
/// Delivery is at-least-once: a consumer acknowledges a message only after
/// its handler succeeded, so a failed handler leads to redelivery. An
/// enqueue failure is returned to the caller and fails the triggering action.
#[async_trait]
pub trait JobDispatcher: Send + Sync + fmt::Debug + 'static {
    /// Enqueue `body` under `job_type`. Higher `priority` is consumed first.
    async fn send(&self, priority: u8, job_type: &str, body: Bytes) -> AppResult<()>;
}
