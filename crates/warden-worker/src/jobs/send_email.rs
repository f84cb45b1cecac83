//! E-mail delivery job.
//!
//! The body of a `send-email` message is the JSON encoding of
//! [`EmailMessage`]. Transport is delegated to a [`Mailer`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use warden_core::error::AppError;
use warden_core::result::AppResult;

use crate::executor::{JobExecutionError, JobHandler};
use crate::queue::QueuedJob;

/// Job type of e-mail delivery messages.
pub const SEND_EMAIL: &str = "send-email";

/// Priority e-mail messages are enqueued with.
pub const SEND_EMAIL_PRIORITY: u8 = 1;

/// An e-mail ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Outbound mail transport.
#[async_trait]
pub trait Mailer: Send + Sync + std::fmt::Debug {
    /// Deliver one message.
    async fn send(&self, message: &EmailMessage) -> AppResult<()>;
}

/// Transport that only logs deliveries.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        tracing::info!(to = %message.to, subject = %message.subject, "Email delivered (log transport)");
        Ok(())
    }
}

/// Transport that keeps delivered messages in memory.
#[derive(Debug, Default)]
pub struct MemoryMailer {
    outbox: Mutex<Vec<EmailMessage>>,
    failures_left: Mutex<u32>,
}

impl MemoryMailer {
    /// Create an empty mailer
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` deliveries fail.
    pub async fn fail_next(&self, count: u32) {
        *self.failures_left.lock().await = count;
    }

    /// Messages delivered so far, oldest first.
    pub async fn outbox(&self) -> Vec<EmailMessage> {
        self.outbox.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        let mut failures_left = self.failures_left.lock().await;
        if *failures_left > 0 {
            *failures_left -= 1;
            return Err(AppError::internal("Mail transport unavailable"));
        }
        self.outbox.lock().await.push(message.clone());
        Ok(())
    }
}

/// Handles `send-email` messages
#[derive(Debug)]
pub struct SendEmailHandler {
    mailer: Arc<dyn Mailer>,
}

impl SendEmailHandler {
    /// Create a handler delivering through `mailer`
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }
}

#[async_trait]
impl JobHandler for SendEmailHandler {
    fn job_type(&self) -> &str {
        SEND_EMAIL
    }

    async fn execute(&self, job: &QueuedJob) -> Result<(), JobExecutionError> {
        let message: EmailMessage = serde_json::from_slice(&job.body).map_err(|e| {
            JobExecutionError::Permanent(format!("Malformed email payload: {e}"))
        })?;

        self.mailer
            .send(&message)
            .await
            .map_err(|e| JobExecutionError::Transient(e.to_string()))?;

        tracing::info!(job_id = %job.id, to = %message.to, "Email sent");
        Ok(())
    }
}
