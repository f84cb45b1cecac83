//! In-process priority job queue.
//!
//! Messages are delivered highest priority first and FIFO within one
//! priority. A received message stays in flight until it is acknowledged,
//! requeued or dead-lettered.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, Notify};
use uuid::Uuid;

use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_core::traits::JobDispatcher;

/// A message as seen by consumers
#[derive(Debug, Clone)]
pub struct QueuedJob {
    /// Message identifier
    pub id: Uuid,
    /// Higher is consumed first
    pub priority: u8,
    /// Handler selector, e.g. `"send-email"`
    pub job_type: String,
    /// Opaque payload
    pub body: Bytes,
    /// Number of deliveries so far, including the current one
    pub attempts: u32,
    /// When the message was first enqueued
    pub enqueued_at: DateTime<Utc>,
}

/// Queue statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    /// Messages waiting for delivery
    pub ready: usize,
    /// Messages delivered but not yet settled
    pub in_flight: usize,
    /// Messages that will not be redelivered
    pub dead: usize,
}

#[derive(Debug, Default)]
struct QueueState {
    ready: BTreeMap<(Reverse<u8>, u64), QueuedJob>,
    in_flight: HashMap<Uuid, QueuedJob>,
    dead: Vec<QueuedJob>,
    seq: u64,
}

impl QueueState {
    fn push(&mut self, job: QueuedJob) {
        self.seq += 1;
        self.ready.insert((Reverse(job.priority), self.seq), job);
    }
}

/// Priority queue with acknowledgement, shared by producers and the worker
#[derive(Debug, Default)]
pub struct MemoryQueue {
    state: Mutex<QueueState>,
    notify: Notify,
}

impl MemoryQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a message and return its id
    pub async fn enqueue(&self, priority: u8, job_type: &str, body: Bytes) -> AppResult<Uuid> {
        if job_type.is_empty() {
            return Err(AppError::queue("Job type must not be empty"));
        }

        let job = QueuedJob {
            id: Uuid::new_v4(),
            priority,
            job_type: job_type.to_string(),
            body,
            attempts: 0,
            enqueued_at: Utc::now(),
        };
        let id = job.id;

        self.state.lock().await.push(job);
        self.notify.notify_one();

        tracing::debug!(job_id = %id, job_type = %job_type, priority = priority, "Enqueued job");
        Ok(id)
    }

    /// Take the next ready message, if any, and mark it in flight
    pub async fn try_receive(&self) -> Option<QueuedJob> {
        let mut state = self.state.lock().await;
        let (_, mut job) = state.ready.pop_first()?;
        job.attempts += 1;
        state.in_flight.insert(job.id, job.clone());
        Some(job)
    }

    /// Wait for the next ready message and mark it in flight
    pub async fn receive(&self) -> QueuedJob {
        loop {
            if let Some(job) = self.try_receive().await {
                return job;
            }
            self.notify.notified().await;
        }
    }

    /// Settle an in-flight message as processed
    pub async fn ack(&self, id: Uuid) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state
            .in_flight
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::queue(format!("Job {id} is not in flight")))
    }

    /// Return an in-flight message to the queue, or dead-letter it
    pub async fn nack(&self, id: Uuid, requeue: bool) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let job = state
            .in_flight
            .remove(&id)
            .ok_or_else(|| AppError::queue(format!("Job {id} is not in flight")))?;

        if requeue {
            state.push(job);
            drop(state);
            self.notify.notify_one();
        } else {
            tracing::warn!(job_id = %id, job_type = %job.job_type, attempts = job.attempts, "Job dead-lettered");
            state.dead.push(job);
        }
        Ok(())
    }

    /// Messages that will not be redelivered
    pub async fn dead_letters(&self) -> Vec<QueuedJob> {
        self.state.lock().await.dead.clone()
    }

    /// Current queue statistics
    pub async fn stats(&self) -> QueueStats {
        let state = self.state.lock().await;
        QueueStats {
            ready: state.ready.len(),
            in_flight: state.in_flight.len(),
            dead: state.dead.len(),
        }
    }
}

#[async_trait]
impl JobDispatcher for MemoryQueue {
    async fn send(&self, priority: u8, job_type: &str, body: Bytes) -> AppResult<()> {
        self.enqueue(priority, job_type, body).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_priority_then_fifo_order() {
        let queue = MemoryQueue::new();
        queue.enqueue(1, "a", Bytes::from_static(b"1")).await.unwrap();
        queue.enqueue(5, "b", Bytes::from_static(b"2")).await.unwrap();
        queue.enqueue(1, "c", Bytes::from_static(b"3")).await.unwrap();
        queue.enqueue(5, "d", Bytes::from_static(b"4")).await.unwrap();

        let mut order = Vec::new();
        while let Some(job) = queue.try_receive().await {
            order.push(job.job_type);
        }
        assert_eq!(order, ["b", "d", "a", "c"]);
    }

    #[tokio::test]
    async fn test_ack_settles_and_nack_requeues() {
        let queue = MemoryQueue::new();
        queue.enqueue(1, "send-email", Bytes::new()).await.unwrap();

        let job = queue.try_receive().await.unwrap();
        assert_eq!(job.attempts, 1);
        assert_eq!(queue.stats().await.in_flight, 1);

        queue.nack(job.id, true).await.unwrap();
        let again = queue.try_receive().await.unwrap();
        assert_eq!(again.id, job.id);
        assert_eq!(again.attempts, 2);

        queue.ack(again.id).await.unwrap();
        assert_eq!(queue.stats().await, QueueStats::default());
        assert!(queue.ack(again.id).await.is_err());
    }

    #[tokio::test]
    async fn test_nack_without_requeue_dead_letters() {
        let queue = MemoryQueue::new();
        queue.enqueue(1, "unknown", Bytes::new()).await.unwrap();
        let job = queue.try_receive().await.unwrap();
        queue.nack(job.id, false).await.unwrap();

        assert!(queue.try_receive().await.is_none());
        assert_eq!(queue.dead_letters().await.len(), 1);
    }

    #[tokio::test]
    async fn test_receive_waits_for_send() {
        let queue = Arc::new(MemoryQueue::new());
        let consumer = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.receive().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        queue.send(1, "send-email", Bytes::from_static(b"{}")).await.unwrap();

        let job = tokio::time::timeout(Duration::from_secs(1), consumer)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(job.job_type, "send-email");
    }

    #[tokio::test]
    async fn test_empty_job_type_is_rejected() {
        let queue = MemoryQueue::new();
        let err = queue.send(1, "", Bytes::new()).await.unwrap_err();
        assert_eq!(err.kind, warden_core::error::ErrorKind::Queue);
    }
}
