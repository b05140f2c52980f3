//! Order store trait.

use async_trait::async_trait;
use common::{OrderId, UserId};
use domain::{Order, OrderStatus};

use crate::error::Result;

/// Outcome of a conditional status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusUpdate {
    /// The order had the expected status and was moved to the new one.
    Applied,

    /// The order exists but its status was not the expected one;
    /// nothing was changed.
    Skipped { actual: OrderStatus },

    /// The order does not exist.
    Missing,
}

impl StatusUpdate {
    /// Returns true if the status was changed.
    pub fn is_applied(&self) -> bool {
        matches!(self, StatusUpdate::Applied)
    }
}

/// Storage for orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Inserts a newly created order.
    async fn insert(&self, order: &Order) -> Result<()>;

    /// Loads an order by ID.
    async fn get(&self, id: OrderId) -> Result<Option<Order>>;

    /// Lists a user's orders, oldest first.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>>;

    /// Lists every order, oldest first.
    async fn list_all(&self) -> Result<Vec<Order>>;

    /// Moves an order to `next` only if its current status is
    /// `expected`.
    ///
    /// This is the primitive that makes cancellation and the delayed
    /// background transitions race-safe: whichever update runs second
    /// sees a changed status and is skipped.
    async fn update_status_if(
        &self,
        id: OrderId,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> Result<StatusUpdate>;
}
