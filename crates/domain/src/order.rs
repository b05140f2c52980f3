//! Order entity.

use chrono::{DateTime, Utc};
use common::{OrderId, ProductId, UserId};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::status::OrderStatus;

/// A purchased line item.
///
/// Everything is snapshotted at checkout time; later catalog changes
/// never re-price an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// The purchased product.
    pub product_id: ProductId,

    /// Product name at checkout time.
    pub product_name: String,

    /// Unit price at checkout time.
    pub unit_price: Money,

    /// Units purchased.
    pub quantity: u32,

    /// `unit_price * quantity`, captured at checkout time.
    pub line_total: Money,
}

impl OrderItem {
    /// Creates a new order line, computing the line total.
    pub fn new(
        product_id: ProductId,
        product_name: impl Into<String>,
        unit_price: Money,
        quantity: u32,
    ) -> Self {
        Self {
            product_id,
            product_name: product_name.into(),
            unit_price,
            quantity,
            line_total: unit_price.multiply(quantity),
        }
    }
}

/// An immutable purchase record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,

    /// The purchasing user.
    pub user_id: UserId,

    /// Snapshot of what was purchased.
    pub items: Vec<OrderItem>,

    /// Sum of the line totals.
    pub total_amount: Money,

    /// Current lifecycle status.
    pub status: OrderStatus,

    /// When checkout created the order.
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Creates a new pending order from checkout line items.
    pub fn new(user_id: UserId, items: Vec<OrderItem>) -> Self {
        let total_amount = items.iter().map(|item| item.line_total).sum();
        Self {
            id: OrderId::new(),
            user_id,
            items,
            total_amount,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Rebuilds an order from stored parts.
    pub fn from_parts(
        id: OrderId,
        user_id: UserId,
        items: Vec<OrderItem>,
        status: OrderStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        let total_amount = items.iter().map(|item| item.line_total).sum();
        Self {
            id,
            user_id,
            items,
            total_amount,
            status,
            created_at,
        }
    }

    /// Returns the number of line items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}
