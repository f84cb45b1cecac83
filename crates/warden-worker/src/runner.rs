//! Worker runner, the loop that consumes the queue and executes jobs.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Semaphore, watch};

use warden_core::config::WorkerConfig;

use crate::executor::{JobExecutionError, JobExecutor};
use crate::queue::{MemoryQueue, QueuedJob};

/// How a delivery was settled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Handler succeeded and the message was acknowledged
    Acked,
    /// Handler failed transiently and the message was requeued
    Requeued,
    /// Handler failed permanently, no handler exists, or attempts ran out
    DeadLettered,
}

/// Main worker runner that consumes the queue and executes jobs
#[derive(Debug, Clone)]
pub struct WorkerRunner {
    queue: Arc<MemoryQueue>,
    executor: Arc<JobExecutor>,
    config: WorkerConfig,
}

impl WorkerRunner {
    /// Create a new worker runner
    pub fn new(queue: Arc<MemoryQueue>, executor: Arc<JobExecutor>, config: WorkerConfig) -> Self {
        Self {
            queue,
            executor,
            config,
        }
    }

    /// Consume the queue until the cancel signal is received
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        let concurrency = self.config.concurrency.max(1);
        tracing::info!(
            worker = %self.config.name,
            concurrency = concurrency,
            handlers = ?self.executor.registered_types(),
            "Worker started"
        );

        let semaphore = Arc::new(Semaphore::new(concurrency));

        loop {
            let permit = tokio::select! {
                _ = cancelled(&mut cancel) => break,
                permit = Arc::clone(&semaphore).acquire_owned() => match permit {
                    Ok(p) => p,
                    Err(_) => break,
                },
            };

            let job = tokio::select! {
                _ = cancelled(&mut cancel) => break,
                job = self.queue.receive() => job,
            };

            let runner = self.clone();
            tokio::spawn(async move {
                let _permit = permit;
                runner.process(job).await;
            });
        }

        tracing::info!(worker = %self.config.name, "Worker waiting for in-flight jobs");

        let grace = Duration::from_secs(self.config.shutdown_grace_seconds);
        let permits = u32::try_from(concurrency).unwrap_or(u32::MAX);
        if tokio::time::timeout(grace, semaphore.acquire_many(permits))
            .await
            .is_err()
        {
            tracing::warn!(worker = %self.config.name, "Shutdown grace period elapsed with jobs in flight");
        }

        tracing::info!(worker = %self.config.name, "Worker shut down");
    }

    /// Process the next ready message, if any. Returns how it was settled.
    pub async fn run_once(&self) -> Option<Settlement> {
        let job = self.queue.try_receive().await?;
        Some(self.process(job).await)
    }

    /// Process ready messages until the queue has none left.
    pub async fn drain(&self) -> Vec<Settlement> {
        let mut settled = Vec::new();
        while let Some(settlement) = self.run_once().await {
            settled.push(settlement);
        }
        settled
    }

    async fn process(&self, job: QueuedJob) -> Settlement {
        let started = Instant::now();
        let job_id = job.id;

        let settlement = match self.executor.execute(&job).await {
            Ok(()) => {
                tracing::info!(
                    job_id = %job_id,
                    job_type = %job.job_type,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Job completed"
                );
                Settlement::Acked
            }
            Err(JobExecutionError::Permanent(msg)) => {
                tracing::error!(job_id = %job_id, job_type = %job.job_type, error = %msg, "Job failed permanently");
                Settlement::DeadLettered
            }
            Err(e) => {
                if job.attempts >= self.config.max_attempts {
                    tracing::error!(
                        job_id = %job_id,
                        job_type = %job.job_type,
                        attempts = job.attempts,
                        error = %e,
                        "Job failed, attempts exhausted"
                    );
                    Settlement::DeadLettered
                } else {
                    tracing::warn!(
                        job_id = %job_id,
                        job_type = %job.job_type,
                        attempts = job.attempts,
                        error = %e,
                        "Job failed, will be redelivered"
                    );
                    if self.config.retry_delay_ms > 0 {
                        tokio::time::sleep(Duration::from_millis(self.config.retry_delay_ms)).await;
                    }
                    Settlement::Requeued
                }
            }
        };

        let settled = match settlement {
            Settlement::Acked => self.queue.ack(job_id).await,
            Settlement::Requeued => self.queue.nack(job_id, true).await,
            Settlement::DeadLettered => self.queue.nack(job_id, false).await,
        };
        if let Err(e) = settled {
            tracing::error!(job_id = %job_id, error = %e, "Failed to settle job");
        }

        settlement
    }
}

async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    while !*cancel.borrow_and_update() {
        if cancel.changed().await.is_err() {
            return;
        }
    }
}
