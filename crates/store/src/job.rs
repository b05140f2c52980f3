//! Delayed status-transition jobs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::OrderId;
use domain::OrderStatus;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A delayed order-status transition, keyed by order ID and target
/// status.
///
/// Jobs replace in-process timers: they live in the store, survive
/// restarts (on durable backends), and carry the `expected` status so
/// the worker's update stays conditional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionJob {
    /// The order to transition.
    pub order_id: OrderId,

    /// Status the order must still have for the transition to apply.
    pub expected: OrderStatus,

    /// Status to move the order to.
    pub target: OrderStatus,

    /// When the transition becomes due.
    pub due_at: DateTime<Utc>,
}

impl TransitionJob {
    /// Creates a new transition job.
    pub fn new(
        order_id: OrderId,
        expected: OrderStatus,
        target: OrderStatus,
        due_at: DateTime<Utc>,
    ) -> Self {
        Self {
            order_id,
            expected,
            target,
            due_at,
        }
    }

    /// Returns true if the job is due at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_at <= now
    }
}

/// Storage for pending transition jobs.
#[async_trait]
pub trait TransitionJobStore: Send + Sync {
    /// Adds a job to the queue.
    async fn enqueue(&self, job: TransitionJob) -> Result<()>;

    /// Atomically removes and returns every job due at `now`, earliest
    /// first.
    async fn claim_due(&self, now: DateTime<Utc>) -> Result<Vec<TransitionJob>>;

    /// Returns the number of jobs not yet claimed.
    async fn pending_count(&self) -> Result<usize>;
}
