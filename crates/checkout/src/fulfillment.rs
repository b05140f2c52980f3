//! Background worker for delayed order-status transitions.

use std::time::Duration;

use chrono::{DateTime, Utc};
use store::{OrderStore, StatusUpdate, StoreError, TransitionJobStore};

/// Applies due transition jobs with conditional status updates.
///
/// Every update is "move to target only if the order still has the
/// expected status", so a job that lost a race — the order was canceled
/// first, or a predecessor transition never fired — is dropped instead
/// of overwriting newer state. Job failures are logged and swallowed;
/// they are never retried and never surface to the user who checked
/// out.
pub struct TransitionWorker<O, J>
where
    O: OrderStore,
    J: TransitionJobStore,
{
    orders: O,
    jobs: J,
    poll_interval: Duration,
}

impl<O, J> TransitionWorker<O, J>
where
    O: OrderStore,
    J: TransitionJobStore,
{
    /// Creates a new worker.
    pub fn new(orders: O, jobs: J, poll_interval: Duration) -> Self {
        Self {
            orders,
            jobs,
            poll_interval,
        }
    }

    /// Polls for due jobs until the surrounding task is dropped.
    pub async fn run(&self) {
        loop {
            if let Err(e) = self.drain_due(Utc::now()).await {
                tracing::error!(error = %e, "failed to claim due transition jobs");
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Claims and applies every job due at `now`, returning how many
    /// transitions were applied.
    #[tracing::instrument(skip(self))]
    pub async fn drain_due(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let due = self.jobs.claim_due(now).await?;
        let mut applied = 0;

        for job in due {
            match self
                .orders
                .update_status_if(job.order_id, job.expected, job.target)
                .await
            {
                Ok(StatusUpdate::Applied) => {
                    applied += 1;
                    metrics::counter!("order_transitions_applied").increment(1);
                    tracing::info!(order_id = %job.order_id, target = %job.target, "order status advanced");
                }
                Ok(StatusUpdate::Skipped { actual }) => {
                    metrics::counter!("order_transitions_skipped").increment(1);
                    tracing::warn!(
                        order_id = %job.order_id,
                        expected = %job.expected,
                        %actual,
                        target = %job.target,
                        "transition skipped, order status changed underneath"
                    );
                }
                Ok(StatusUpdate::Missing) => {
                    tracing::warn!(order_id = %job.order_id, "transition skipped, order missing");
                }
                Err(e) => {
                    tracing::error!(order_id = %job.order_id, error = %e, "transition failed");
                }
            }
        }

        Ok(applied)
    }
}
